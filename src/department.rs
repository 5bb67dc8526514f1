// src/department.rs
// Departments of the hospital front desk and their static configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction for the Central Manager, used by the router
pub const CENTRAL_MANAGER_INSTRUCTION: &str = r#"
Anda adalah Manajer Pusat sistem Manage Hospital Operations, seorang pakar dalam sistem informasi rumah sakit dan kepatuhan data. Peran Anda secara ketat terbatas pada dua langkah: (1) Menganalisis permintaan pengguna untuk mengidentifikasi fungsi operasional rumah sakit yang dimaksud, dan (2) Mendelegasikan tugas tersebut kepada salah satu Sub-Agen spesialis yang tersedia.

**ATURAN KUNCI (Constraints):**
1.  **DELEGASI WAJIB:** Anda harus selalu memilih SATU dari empat Sub-Agen (Fungsi/Tools) yang tersedia.
2.  **CONTEXT PASSING:** Pastikan seluruh konteks asli permintaan pengguna, termasuk detail spesifik apa pun (misalnya, nama pasien, nama obat, nomor tagihan), diteruskan sepenuhnya kepada Sub-Agen yang dipilih.
3.  **TIDAK MEMPROSES:** Anda dilarang memproses atau menjawab konten permintaan secara langsung. Keluaran Anda harus berupa *function call* yang mewakili delegasi ke Sub-Agen.

**SUB-AGEN/FUNGSI YANG TERSEDIA (Available Tools):**

1.  **PatientAdmissionAgent:** Untuk semua tugas pendaftaran pasien, pembaruan rekam medis, atau manajemen penerimaan/pemulangan.
2.  **AppointmentSchedulingAgent:** Untuk memesan, menjadwal ulang, atau memverifikasi ketersediaan dokter/janji temu.
3.  **PharmacyManagementAgent:** Untuk permintaan terkait obat, pemeriksaan stok, atau pembuatan resep.
4.  **BillingAndFinanceAgent:** Untuk pertanyaan mengenai faktur, tagihan, klaim asuransi, atau perkiraan biaya.
"#;

/// One of the five fixed conversational personas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Central,
    Admission,
    Scheduling,
    Pharmacy,
    Billing,
}

impl Department {
    /// Every department, in sidebar order
    pub const ALL: [Department; 5] = [
        Self::Central,
        Self::Admission,
        Self::Scheduling,
        Self::Pharmacy,
        Self::Billing,
    ];

    /// Departments the Central Manager can delegate to
    pub const SPECIALISTS: [Department; 4] = [
        Self::Admission,
        Self::Scheduling,
        Self::Pharmacy,
        Self::Billing,
    ];

    /// Stable key used in JSON and URLs
    pub fn key(&self) -> &'static str {
        match self {
            Self::Central => "central",
            Self::Admission => "admission",
            Self::Scheduling => "scheduling",
            Self::Pharmacy => "pharmacy",
            Self::Billing => "billing",
        }
    }

    /// Agent name shown on messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Central => "Central Manager",
            Self::Admission => "Patient Admission Agent",
            Self::Scheduling => "Appointment Scheduling Agent",
            Self::Pharmacy => "Pharmacy Management Agent",
            Self::Billing => "Billing & Finance Agent",
        }
    }

    /// Sidebar label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Central => "Central Command",
            Self::Admission => "Admissions",
            Self::Scheduling => "Scheduling",
            Self::Pharmacy => "Pharmacy",
            Self::Billing => "Billing & Finance",
        }
    }

    /// Icon name (lucide icon set) for the browser UI
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Central => "LayoutDashboard",
            Self::Admission => "UserPlus",
            Self::Scheduling => "CalendarClock",
            Self::Pharmacy => "Pill",
            Self::Billing => "Receipt",
        }
    }

    /// Accent colour name for the browser UI
    pub fn accent(&self) -> &'static str {
        match self {
            Self::Central => "slate",
            Self::Admission => "blue",
            Self::Scheduling => "purple",
            Self::Pharmacy => "emerald",
            Self::Billing => "amber",
        }
    }

    /// System instruction for this department's persona
    pub fn persona(&self) -> &'static str {
        match self {
            Self::Central => CENTRAL_MANAGER_INSTRUCTION,
            Self::Admission => "Anda adalah Patient Admission Agent. Tugas Anda: Mendaftarkan pasien, memperbarui rekam medis, dan menangani prosedur masuk/keluar. Gunakan gaya profesional. Format output Anda seolah-olah Anda sedang mengisi formulir atau membuat dokumen resmi.",
            Self::Scheduling => "Anda adalah Appointment Scheduling Agent. Tugas Anda: Mengatur jadwal dokter. Verifikasi ketersediaan (simulasi) dan konfirmasi waktu. Berikan respons yang sopan dan jelas mengenai waktu dan tempat.",
            Self::Pharmacy => "Anda adalah Pharmacy Management Agent. Tugas Anda: Cek stok obat dan buat resep. Jika diminta resep, buat format dokumen resep standar. Peringatkan tentang dosis jika perlu.",
            Self::Billing => "Anda adalah Billing and Finance Agent. Tugas Anda: Menangani faktur dan klaim asuransi. Hasilkan rincian biaya yang transparan dan profesional. Gunakan format tabel atau daftar untuk rincian harga.",
        }
    }

    /// Name of the delegation function the router exposes for this department.
    /// The Central Manager has none.
    pub fn tool_name(&self) -> Option<&'static str> {
        match self {
            Self::Central => None,
            Self::Admission => Some("delegateToAdmission"),
            Self::Scheduling => Some("delegateToScheduling"),
            Self::Pharmacy => Some("delegateToPharmacy"),
            Self::Billing => Some("delegateToBilling"),
        }
    }

    /// Description of the delegation function
    pub fn tool_description(&self) -> Option<&'static str> {
        match self {
            Self::Central => None,
            Self::Admission => Some("Delegates the task to the Patient Admission Agent for registration or medical records."),
            Self::Scheduling => Some("Delegates the task to the Appointment Scheduling Agent for booking or availability checks."),
            Self::Pharmacy => Some("Delegates the task to the Pharmacy Management Agent for prescriptions or medicine stock."),
            Self::Billing => Some("Delegates the task to the Billing & Finance Agent for invoices, claims, or costs."),
        }
    }

    /// Map a delegation function name back to its department
    pub fn from_tool_name(name: &str) -> Option<Self> {
        match name {
            "delegateToAdmission" => Some(Self::Admission),
            "delegateToScheduling" => Some(Self::Scheduling),
            "delegateToPharmacy" => Some(Self::Pharmacy),
            "delegateToBilling" => Some(Self::Billing),
            _ => None,
        }
    }

    /// Parse a department from its key
    pub fn from_key(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == s.to_lowercase())
    }

    pub fn is_central(&self) -> bool {
        matches!(self, Self::Central)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Sidebar entry served to the browser
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub accent: &'static str,
}

impl From<Department> for DepartmentInfo {
    fn from(d: Department) -> Self {
        Self {
            key: d.key(),
            name: d.display_name(),
            label: d.label(),
            icon: d.icon(),
            accent: d.accent(),
        }
    }
}
