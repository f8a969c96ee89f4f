//! SAM message parsing and formatting.
//!
//! This module handles the low-level protocol details for communicating
//! with a SAM bridge: the line-oriented `MODULE OPERATION KEY=VALUE ...`
//! grammar, message construction, and reply validation.

use crate::error::{Result, SamError};
use std::fmt;

/// A single SAM protocol message.
///
/// A message is a module name, an operation name, and an ordered set of
/// `KEY=VALUE` arguments. Messages built with [`SamMessage::new`] are
/// mutable until sent; messages parsed from the wire with
/// [`SamMessage::parse`] are read-only for their whole lifetime.
#[derive(Debug, Clone)]
pub struct SamMessage {
    module: Option<String>,
    operation: Option<String>,
    /// Upper-cased keys in insertion order. Order matters for serialization.
    args: Vec<(String, String)>,
    modifiable: bool,
}

impl SamMessage {
    /// Create a new message with the given module and operation.
    ///
    /// Both names are normalized to upper case. The returned message is
    /// modifiable: arguments can be added with [`SamMessage::set`].
    pub fn new(module: &str, operation: &str) -> Self {
        SamMessage {
            module: Some(module.to_ascii_uppercase()),
            operation: Some(operation.to_ascii_uppercase()),
            args: Vec::new(),
            modifiable: true,
        }
    }

    /// Parse a message from a wire line.
    ///
    /// Tokens are separated by spaces. Each `KEY=VALUE` token sets an
    /// argument; the first two bare tokens become module and operation. A
    /// third bare token fails with [`SamError::InvalidMessage`]. A line with
    /// fewer than two bare tokens parses with module and/or operation unset;
    /// reply validation catches such structurally incomplete messages.
    ///
    /// Note that quotes are not interpreted here: the serializer wraps
    /// space-containing values in double quotes, but the parser splits
    /// strictly on spaces. This asymmetry matches the wire behavior of
    /// existing SAM clients and is kept for compatibility.
    pub fn parse(line: &str) -> Result<Self> {
        let mut module = None;
        let mut operation = None;
        let mut args: Vec<(String, String)> = Vec::new();

        for token in line.split(' ').filter(|t| !t.is_empty()) {
            if let Some(idx) = token.find('=') {
                let key = token[..idx].to_ascii_uppercase();
                let value = token[idx + 1..].to_string();
                set_arg(&mut args, key, value);
            } else if module.is_none() {
                module = Some(token.to_ascii_uppercase());
            } else if operation.is_none() {
                operation = Some(token.to_ascii_uppercase());
            } else {
                return Err(SamError::InvalidMessage(format!(
                    "more than two base tokens in: '{}'",
                    line
                )));
            }
        }

        Ok(SamMessage {
            module,
            operation,
            args,
            modifiable: false,
        })
    }

    /// Get the message module, if present.
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Get the message operation, if present.
    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Check whether this message can still be modified.
    ///
    /// Newly created messages are modifiable; parsed ones are not.
    pub fn is_modifiable(&self) -> bool {
        self.modifiable
    }

    /// Get an argument value. The key lookup is case-insensitive.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_ascii_uppercase();
        self.args
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an argument on the message. The key is upper-cased.
    ///
    /// Setting a key that is already present overwrites its value in place,
    /// so the original insertion order is preserved. Fails with
    /// [`SamError::ImmutableMessage`] on a parsed message.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.modifiable {
            return Err(SamError::ImmutableMessage);
        }
        set_arg(&mut self.args, key.to_ascii_uppercase(), value.to_string());
        Ok(())
    }

    /// Validate the message against an expected module, operation, and
    /// argument criteria.
    ///
    /// Module and operation are compared case-insensitively. Each criterion
    /// is a one- or two-element slice: `[KEY]` checks only that the key is
    /// present, `[KEY, VALUE]` checks that the key holds exactly that value
    /// (case-sensitive). Returns `false` on any mismatch, including a
    /// missing module or operation.
    ///
    /// # Panics
    ///
    /// Panics if a criterion has zero or more than two elements; that is a
    /// programming error, not a protocol error.
    pub fn validate(&self, module: &str, operation: &str, criteria: &[&[&str]]) -> bool {
        if self.module.as_deref() != Some(module.to_ascii_uppercase().as_str()) {
            return false;
        }
        if self.operation.as_deref() != Some(operation.to_ascii_uppercase().as_str()) {
            return false;
        }

        for criterion in criteria {
            match criterion {
                [key] => {
                    if self.get(key).is_none() {
                        return false;
                    }
                }
                [key, value] => {
                    if self.get(key) != Some(*value) {
                        return false;
                    }
                }
                _ => panic!("every validation criterion must have one or two elements"),
            }
        }

        true
    }

    /// Serialize the message into its wire form, without the trailing
    /// newline.
    ///
    /// Arguments appear in insertion order. A value containing a space is
    /// wrapped in double quotes; the value itself is not otherwise escaped.
    pub fn to_line(&self) -> String {
        let mut line = String::with_capacity(64);

        if let Some(module) = &self.module {
            line.push_str(module);
        }
        if let Some(operation) = &self.operation {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(operation);
        }

        for (key, value) in &self.args {
            line.push(' ');
            line.push_str(key);
            line.push('=');
            if value.contains(' ') {
                line.push('"');
                line.push_str(value);
                line.push('"');
            } else {
                line.push_str(value);
            }
        }

        line
    }
}

impl fmt::Display for SamMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line())
    }
}

/// Insert or overwrite an argument, keeping the original insertion slot on
/// overwrite.
fn set_arg(args: &mut Vec<(String, String)>, key: String, value: String) {
    match args.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => args.push((key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let msg = SamMessage::parse("HELLO REPLY RESULT=OK VERSION=3.0").unwrap();
        assert_eq!(msg.module(), Some("HELLO"));
        assert_eq!(msg.operation(), Some("REPLY"));
        assert_eq!(msg.get("RESULT"), Some("OK"));
        assert_eq!(msg.get("VERSION"), Some("3.0"));
    }

    #[test]
    fn test_parse_three_bare_tokens() {
        let result = SamMessage::parse("NAMING REPLY EXTRA RESULT=OK");
        assert!(matches!(result, Err(SamError::InvalidMessage(_))));
    }

    #[test]
    fn test_parse_zero_bare_tokens() {
        let msg = SamMessage::parse("RESULT=OK VALUE=abc").unwrap();
        assert_eq!(msg.module(), None);
        assert_eq!(msg.operation(), None);
        assert_eq!(msg.get("VALUE"), Some("abc"));
    }

    #[test]
    fn test_parse_lowercase_normalized() {
        let msg = SamMessage::parse("naming reply result=OK").unwrap();
        assert_eq!(msg.module(), Some("NAMING"));
        assert_eq!(msg.operation(), Some("REPLY"));
        assert_eq!(msg.get("RESULT"), Some("OK"));
    }

    #[test]
    fn test_parse_skips_repeated_spaces() {
        let msg = SamMessage::parse("HELLO  REPLY  RESULT=OK").unwrap();
        assert_eq!(msg.module(), Some("HELLO"));
        assert_eq!(msg.operation(), Some("REPLY"));
    }

    #[test]
    fn test_get_case_insensitive() {
        let msg = SamMessage::parse("NAMING REPLY NAME=forum.i2p").unwrap();
        assert_eq!(msg.get("name"), Some("forum.i2p"));
        assert_eq!(msg.get("NAME"), Some("forum.i2p"));
        assert_eq!(msg.get("NaMe"), Some("forum.i2p"));
    }

    #[test]
    fn test_last_write_wins() {
        let msg = SamMessage::parse("HELLO REPLY RESULT=FAIL RESULT=OK").unwrap();
        assert_eq!(msg.get("RESULT"), Some("OK"));
    }

    #[test]
    fn test_set_keeps_insertion_order_on_overwrite() {
        let mut msg = SamMessage::new("SESSION", "CREATE");
        msg.set("STYLE", "DATAGRAM").unwrap();
        msg.set("ID", "one").unwrap();
        msg.set("style", "STREAM").unwrap();
        assert_eq!(msg.to_line(), "SESSION CREATE STYLE=STREAM ID=one");
    }

    #[test]
    fn test_parsed_message_is_immutable() {
        let mut msg = SamMessage::parse("HELLO REPLY RESULT=OK").unwrap();
        assert!(!msg.is_modifiable());
        let result = msg.set("RESULT", "FAIL");
        assert!(matches!(result, Err(SamError::ImmutableMessage)));
        assert_eq!(msg.get("RESULT"), Some("OK"));
    }

    #[test]
    fn test_built_message_serialization() {
        let mut msg = SamMessage::new("hello", "version");
        msg.set("MIN", "3.0").unwrap();
        msg.set("MAX", "3.0").unwrap();
        assert_eq!(msg.to_line(), "HELLO VERSION MIN=3.0 MAX=3.0");
        assert_eq!(format!("{}", msg), msg.to_line());
    }

    #[test]
    fn test_serialization_quotes_spaces() {
        let mut msg = SamMessage::new("NAMING", "LOOKUP");
        msg.set("NAME", "two words").unwrap();
        assert_eq!(msg.to_line(), "NAMING LOOKUP NAME=\"two words\"");
    }

    #[test]
    fn test_round_trip() {
        let mut msg = SamMessage::new("DEST", "REPLY");
        msg.set("PUB", "pubkey123").unwrap();
        msg.set("PRIV", "privkey456").unwrap();

        let parsed = SamMessage::parse(&msg.to_line()).unwrap();
        assert_eq!(parsed.module(), Some("DEST"));
        assert_eq!(parsed.operation(), Some("REPLY"));
        assert_eq!(parsed.get("PUB"), Some("pubkey123"));
        assert_eq!(parsed.get("PRIV"), Some("privkey456"));
        assert_eq!(parsed.to_line(), msg.to_line());
    }

    #[test]
    fn test_validate_matching() {
        let msg = SamMessage::parse("NAMING REPLY RESULT=OK VALUE=abc").unwrap();
        assert!(msg.validate("NAMING", "reply", &[&["RESULT", "OK"]]));
        assert!(msg.validate("naming", "REPLY", &[&["VALUE"]]));
        assert!(msg.validate("NAMING", "REPLY", &[&["RESULT", "OK"], &["VALUE", "abc"]]));
    }

    #[test]
    fn test_validate_mismatch() {
        let msg = SamMessage::parse("NAMING REPLY RESULT=KEY_NOT_FOUND").unwrap();
        assert!(!msg.validate("NAMING", "REPLY", &[&["RESULT", "OK"]]));
        assert!(!msg.validate("HELLO", "REPLY", &[]));
        assert!(!msg.validate("NAMING", "LOOKUP", &[]));
        assert!(!msg.validate("NAMING", "REPLY", &[&["VALUE"]]));
    }

    #[test]
    fn test_validate_value_case_sensitive() {
        let msg = SamMessage::parse("NAMING REPLY RESULT=OK").unwrap();
        assert!(!msg.validate("NAMING", "REPLY", &[&["RESULT", "ok"]]));
    }

    #[test]
    fn test_validate_missing_module() {
        let msg = SamMessage::parse("RESULT=OK").unwrap();
        assert!(!msg.validate("HELLO", "REPLY", &[]));
    }

    #[test]
    #[should_panic(expected = "one or two elements")]
    fn test_validate_malformed_criterion() {
        let msg = SamMessage::parse("HELLO REPLY RESULT=OK").unwrap();
        msg.validate("HELLO", "REPLY", &[&["RESULT", "OK", "extra"]]);
    }

    #[test]
    fn test_quoted_value_not_unescaped_on_parse() {
        // Deliberate asymmetry: the parser splits on spaces and never
        // interprets quotes.
        let msg = SamMessage::parse("NAMING REPLY VALUE=\"two").unwrap();
        assert_eq!(msg.get("VALUE"), Some("\"two"));
    }
}
