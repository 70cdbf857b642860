/// Fold any integer exit code into `0..=255`.
///
/// Runtimes occasionally report negative codes; `-1` becomes `255`.
pub fn collapse_exit_code(code: i64) -> u8 {
    code.rem_euclid(256) as u8
}
