//! One-shot messages shown at the top of a page

use axum::http::HeaderMap;

use crate::auth::session::{clear_cookie, cookie_value, set_cookie};

/// Cookie carrying a notice across a redirect
pub const NOTICE_COOKIE: &str = "liaotian_notice";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Notices that survive a redirect; only a fixed code goes in the cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Registered,
    LoggedOut,
}

impl Notice {
    pub fn code(&self) -> &'static str {
        match self {
            Notice::Registered => "registered",
            Notice::LoggedOut => "logged_out",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "registered" => Some(Notice::Registered),
            "logged_out" => Some(Notice::LoggedOut),
            _ => None,
        }
    }

    pub fn flash(&self) -> Flash {
        match self {
            Notice::Registered => Flash::success("Registration successful, please log in"),
            Notice::LoggedOut => Flash::success("You have been logged out"),
        }
    }

    /// `Set-Cookie` value queueing this notice for the next page
    pub fn set_cookie(&self) -> String {
        set_cookie(NOTICE_COOKIE, self.code())
    }

    /// `Set-Cookie` value dropping a consumed notice
    pub fn clear_cookie() -> String {
        clear_cookie(NOTICE_COOKIE)
    }

    /// Notice queued by the previous response, if any
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        cookie_value(headers, NOTICE_COOKIE).and_then(Self::from_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    #[test]
    fn test_notice_codes_round_trip() {
        for notice in [Notice::Registered, Notice::LoggedOut] {
            assert_eq!(Notice::from_code(notice.code()), Some(notice));
        }
        assert_eq!(Notice::from_code("<script>"), None);
    }

    #[test]
    fn test_notice_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(Notice::from_headers(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("liaotian_notice=registered"));
        assert_eq!(Notice::from_headers(&headers), Some(Notice::Registered));
        assert_eq!(
            Notice::Registered.flash().level,
            FlashLevel::Success
        );
    }
}
