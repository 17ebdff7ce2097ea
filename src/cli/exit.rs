/// Exit codes used across capsule-dist subcommands.
///
/// Mapping:
///   0 — success (report printed)
///   2 — refusal (REFUSAL envelope printed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Refusal = 2,
}

impl From<ExitCode> for u8 {
    fn from(code: ExitCode) -> u8 {
        code as u8
    }
}
