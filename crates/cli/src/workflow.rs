//! GitHub Actions workflow commands written to stdout.

/// Escapes a workflow command payload so multi-line messages survive.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// `::error::` command that marks the step as failed with `message`.
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_percent_before_newlines() {
        assert_eq!(escape_data("100%\r\ndone"), "100%25%0D%0Adone");
    }

    #[test]
    fn error_command_is_single_line() {
        let command = error_command("welcome\n\n- @someone: sign");
        assert_eq!(command, "::error::welcome%0A%0A- @someone: sign");
        assert!(!command.contains('\n'));
    }
}
