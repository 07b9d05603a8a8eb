//! Reusable attribute validators
//!
//! Every validator here skips null and unknown values: a value that is not
//! configured yet cannot be wrong yet.

use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{Diagnostic, Dynamic};
use regex::Regex;

fn invalid(request: &ValidatorRequest, summary: &str, detail: String) -> ValidatorResponse {
    ValidatorResponse {
        diagnostics: vec![Diagnostic::error(summary, detail).with_attribute(request.path.clone())],
    }
}

fn accepted() -> ValidatorResponse {
    ValidatorResponse {
        diagnostics: vec![],
    }
}

/// String length (in characters) within an inclusive range
pub struct StringLengthBetween {
    pub min: usize,
    pub max: usize,
}

impl StringLengthBetween {
    pub fn new(min: usize, max: usize) -> Box<dyn Validator> {
        Box::new(Self { min, max })
    }
}

impl Validator for StringLengthBetween {
    fn description(&self) -> String {
        format!(
            "string length must be between {} and {}",
            self.min, self.max
        )
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Dynamic::String(s) = &request.config_value.value else {
            return accepted();
        };
        let len = s.chars().count();
        if len < self.min || len > self.max {
            return invalid(
                &request,
                "Invalid Attribute Value Length",
                format!(
                    "Attribute {} {}, got: {}",
                    request.path,
                    self.description(),
                    len
                ),
            );
        }
        accepted()
    }
}

/// String must be one of a fixed set of values
pub struct StringValues {
    pub values: Vec<String>,
}

impl StringValues {
    pub fn new(values: &[&str]) -> Box<dyn Validator> {
        Box::new(Self {
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }
}

impl Validator for StringValues {
    fn description(&self) -> String {
        format!("value must be one of: {:?}", self.values)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Dynamic::String(s) = &request.config_value.value else {
            return accepted();
        };
        if !self.values.iter().any(|v| v == s) {
            return invalid(
                &request,
                "Invalid Attribute Value Match",
                format!(
                    "Attribute {} {}, got: {:?}",
                    request.path,
                    self.description(),
                    s
                ),
            );
        }
        accepted()
    }
}

/// Whole number that must be one of a fixed set of values
pub struct IntValues {
    pub values: Vec<i64>,
}

impl IntValues {
    pub fn new(values: &[i64]) -> Box<dyn Validator> {
        Box::new(Self {
            values: values.to_vec(),
        })
    }
}

impl Validator for IntValues {
    fn description(&self) -> String {
        format!("value must be one of: {:?}", self.values)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Dynamic::Number(n) = request.config_value.value else {
            return accepted();
        };
        let matches = n.fract() == 0.0 && self.values.contains(&(n as i64));
        if !matches {
            return invalid(
                &request,
                "Invalid Attribute Value Match",
                format!("Attribute {} {}, got: {}", request.path, self.description(), n),
            );
        }
        accepted()
    }
}

/// Absolute URL with a non-empty host and one of the accepted schemes
pub struct UrlWithScheme {
    pub schemes: Vec<String>,
}

impl UrlWithScheme {
    pub fn new(schemes: &[&str]) -> Box<dyn Validator> {
        Box::new(Self {
            schemes: schemes.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Checks a raw string, returning the reason it was rejected
    pub fn check(&self, raw: &str) -> Result<url::Url, String> {
        let parsed = url::Url::parse(raw).map_err(|e| format!("{:?} is not a valid URL: {}", raw, e))?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(format!("{:?} has no host", raw));
        }
        if !self.schemes.iter().any(|s| s == parsed.scheme()) {
            return Err(format!(
                "{:?} has scheme {:?}, expected one of {:?}",
                raw,
                parsed.scheme(),
                self.schemes
            ));
        }
        Ok(parsed)
    }
}

impl Validator for UrlWithScheme {
    fn description(&self) -> String {
        format!("value must be a URL with one of the schemes: {:?}", self.schemes)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Dynamic::String(s) = &request.config_value.value else {
            return accepted();
        };
        match self.check(s) {
            Ok(_) => accepted(),
            Err(reason) => invalid(
                &request,
                "Invalid URL",
                format!("Attribute {}: {}", request.path, reason),
            ),
        }
    }
}

/// String must match at least one regular expression
pub struct StringMatches {
    patterns: Result<Vec<Regex>, String>,
    message: String,
}

impl StringMatches {
    pub fn new(patterns: &[&str], message: &str) -> Box<dyn Validator> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p).map_err(|e| format!("pattern {:?}: {}", p, e)))
            .collect();
        Box::new(Self {
            patterns,
            message: message.to_string(),
        })
    }
}

impl Validator for StringMatches {
    fn description(&self) -> String {
        self.message.clone()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let Dynamic::String(s) = &request.config_value.value else {
            return accepted();
        };
        match &self.patterns {
            Err(e) => invalid(&request, "Invalid Validator Pattern", e.clone()),
            Ok(patterns) if patterns.iter().any(|re| re.is_match(s)) => accepted(),
            Ok(_) => invalid(
                &request,
                "Invalid Attribute Value Match",
                format!("Attribute {} {}, got: {:?}", request.path, self.message, s),
            ),
        }
    }
}
