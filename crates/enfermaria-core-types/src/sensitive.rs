//! Sensitive data marker for automatic redaction
//!
//! Patient names and logins are personal health data. Wrapping them in
//! `Sensitive<T>` keeps them out of log lines and debug dumps.

use std::fmt;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use enfermaria_core_types::Sensitive;
///
/// let name = Sensitive::new("Maria da Silva");
/// assert_eq!(format!("{:?}", name), "***REDACTED***");
/// assert_eq!(name.expose(), &"Maria da Silva");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_debug_redaction() {
        let name = Sensitive::new("Joana Pereira");
        let debug_str = format!("{:?}", name);
        assert_eq!(debug_str, "***REDACTED***");
        assert!(!debug_str.contains("Joana"));
    }

    #[test]
    fn test_sensitive_display_redaction() {
        let login = Sensitive::new("jpereira");
        assert_eq!(format!("{}", login), "***REDACTED***");
    }

    #[test]
    fn test_sensitive_into_inner() {
        let secret = Sensitive::new(String::from("test"));
        assert_eq!(secret.into_inner(), "test");
    }

    #[test]
    fn test_sensitive_inside_struct_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Patient {
            badge: String,
            name: Sensitive<String>,
        }

        let patient = Patient {
            badge: "12345".to_string(),
            name: Sensitive::new("Ana Souza".to_string()),
        };

        let debug_str = format!("{:?}", patient);
        assert!(debug_str.contains("12345"));
        assert!(debug_str.contains("***REDACTED***"));
        assert!(!debug_str.contains("Ana Souza"));
    }
}
