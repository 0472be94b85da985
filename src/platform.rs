use std::fmt;

/// Operating-system component of a target triple (vendor and ABI included).
///
/// Hosts outside the known set resolve to [`OsVendorAbi::Unknown`] instead of
/// failing, so packaging still produces an artifact, just a less specific one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsVendorAbi {
    AppleDarwin,
    UnknownLinuxGnu,
    PcWindowsMsvc,
    Unknown,
}

impl OsVendorAbi {
    /// Map a raw OS name (as reported by a platform query, e.g. `Darwin`).
    pub fn from_os_name(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "darwin" => Self::AppleDarwin,
            "linux" => Self::UnknownLinuxGnu,
            "windows" => Self::PcWindowsMsvc,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppleDarwin => "apple-darwin",
            Self::UnknownLinuxGnu => "unknown-linux-gnu",
            Self::PcWindowsMsvc => "pc-windows-msvc",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OsVendorAbi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture component of a target triple.
///
/// Unlike the OS component, an unrecognized machine name is kept verbatim
/// (lower-cased) in [`Arch::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Aarch64,
    Other(String),
}

impl Arch {
    pub fn from_machine_name(machine: &str) -> Self {
        let machine = machine.to_ascii_lowercase();
        match machine.as_str() {
            "x86_64" => Self::X86_64,
            "arm64" | "aarch64" => Self::Aarch64,
            // An empty name would leave a blank triple component.
            "" => Self::Other("unknown".to_string()),
            _ => Self::Other(machine),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical `(arch, os-vendor-abi)` pair identifying a build target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetTriple {
    arch: Arch,
    os: OsVendorAbi,
}

impl TargetTriple {
    /// Resolve a triple from raw OS and machine names. Never fails.
    pub fn resolve(os: &str, machine: &str) -> Self {
        let triple = Self {
            arch: Arch::from_machine_name(machine),
            os: OsVendorAbi::from_os_name(os),
        };
        if triple.os == OsVendorAbi::Unknown {
            log::warn!("Unrecognized operating system {os:?}, using 'unknown'");
        }
        if let Arch::Other(raw) = &triple.arch {
            log::warn!("Unrecognized machine {machine:?}, passing through as '{raw}'");
        }
        log::debug!("Resolved ({os:?}, {machine:?}) to {triple}");
        triple
    }

    /// Resolve the triple of the running host.
    pub fn host() -> Self {
        Self::resolve(host_os_name(), host_machine_name())
    }

    pub fn arch(&self) -> &Arch {
        &self.arch
    }

    pub fn os_vendor_abi(&self) -> OsVendorAbi {
        self.os
    }

    /// True when both components were recognized.
    pub fn is_fully_resolved(&self) -> bool {
        self.os != OsVendorAbi::Unknown && !matches!(self.arch, Arch::Other(_))
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.arch, self.os)
    }
}

/// OS name of the running host, spelled the way a platform query reports it.
///
/// Rust calls macOS `macos`; the triple mapping expects `darwin`.
pub fn host_os_name() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Machine (CPU architecture) name of the running host.
pub fn host_machine_name() -> &'static str {
    std::env::consts::ARCH
}
