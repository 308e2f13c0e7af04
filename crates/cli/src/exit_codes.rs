//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (reserved, unspecified)    |
//! | 2       | Universal        | CLI usage error (clap owns this one)     |
//! | 3-9     | audit            | Reconciliation-specific codes            |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

// =============================================================================
// Audit (3-9)
// =============================================================================

/// The run completed but left unreconciled items: partial matches,
/// unmatched orders or extra audit rows. Like `diff(1)`, a nonzero exit
/// means "the sides differ", not that the command failed.
pub const EXIT_AUDIT_UNRECONCILED: u8 = 3;

/// Season config failed to parse or validate.
pub const EXIT_AUDIT_INVALID_CONFIG: u8 = 4;

/// Runtime failure: unreadable input file, malformed repository CSV,
/// unwritable output.
pub const EXIT_AUDIT_RUNTIME: u8 = 5;

/// The audit export failed the header precondition (engine soft failure
/// surfaced as a hard exit for scripts).
pub const EXIT_AUDIT_BAD_SCHEMA: u8 = 6;
