//! Launch parameter handling.
//!
//! External systems start the tool with a case number to prefill, either as
//! `fall=<value>` or as a flag (`--fall`, `/fall`, `-fall`) followed by the
//! value. Keys are matched case-insensitively and only the first match
//! counts.

const PREFILL_KEY: &str = "fall=";
const PREFILL_FLAGS: &[&str] = &["--fall", "/fall", "-fall"];

/// Split the prefill value out of the command line.
///
/// `args` includes the program name, which is never matched. The matched
/// token (and the value following a flag) is removed so the rest can go to
/// the regular argument parser.
pub fn split_prefill(args: impl IntoIterator<Item = String>) -> (Option<String>, Vec<String>) {
    let mut args: Vec<String> = args.into_iter().collect();

    for i in 1..args.len() {
        let token = args[i].trim();

        if let Some(value) = strip_prefix_ignore_case(token, PREFILL_KEY) {
            let value = value.to_string();
            args.remove(i);
            return (Some(value), args);
        }

        if PREFILL_FLAGS.iter().any(|f| token.eq_ignore_ascii_case(f)) {
            let value = (i + 1 < args.len()).then(|| args.remove(i + 1));
            args.remove(i);
            return (value, args);
        }
    }

    (None, args)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(args: &[&str]) -> (Option<String>, Vec<String>) {
        split_prefill(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn key_value_form() {
        let (prefill, rest) = split(&["kdl-qr", "FALL=123456"]);
        assert_eq!(prefill.as_deref(), Some("123456"));
        assert_eq!(rest, vec!["kdl-qr"]);
    }

    #[test]
    fn value_keeps_later_equals_signs() {
        let (prefill, _) = split(&["kdl-qr", "fall=a=b"]);
        assert_eq!(prefill.as_deref(), Some("a=b"));
    }

    #[test]
    fn flag_forms() {
        for flag in ["--fall", "/fall", "-fall", "/FALL"] {
            let (prefill, rest) = split(&["kdl-qr", flag, "777", "codes"]);
            assert_eq!(prefill.as_deref(), Some("777"), "flag {flag}");
            assert_eq!(rest, vec!["kdl-qr", "codes"]);
        }
    }

    #[test]
    fn flag_without_value() {
        let (prefill, rest) = split(&["kdl-qr", "--fall"]);
        assert!(prefill.is_none());
        assert_eq!(rest, vec!["kdl-qr"]);
    }

    #[test]
    fn first_match_wins() {
        let (prefill, rest) = split(&["kdl-qr", "fall=1", "fall=2"]);
        assert_eq!(prefill.as_deref(), Some("1"));
        assert_eq!(rest, vec!["kdl-qr", "fall=2"]);
    }

    #[test]
    fn absent_prefill_leaves_args() {
        let (prefill, rest) = split(&["kdl-qr", "label", "--code", "C34"]);
        assert!(prefill.is_none());
        assert_eq!(rest.len(), 4);
    }

    #[test]
    fn program_name_is_not_matched() {
        let (prefill, rest) = split(&["fall=oops"]);
        assert!(prefill.is_none());
        assert_eq!(rest, vec!["fall=oops"]);
    }
}
