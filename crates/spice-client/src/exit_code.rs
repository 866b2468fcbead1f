//! Process exit codes (§6): `0` success, everything else names a
//! specific failure the launching environment can act on.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    InvalidArg,
    ConnectFailed,
    AuthFailed,
    Disconnect,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InvalidArg => 1,
            Self::ConnectFailed => 2,
            Self::AuthFailed => 3,
            Self::Disconnect => 4,
        }
    }
}
