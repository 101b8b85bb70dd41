//! Custom assertion macros
//!
//! Status and error-body checks for API responses.

/// Assert the response status, printing the body on mismatch
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status_code(),
            $status,
            "Unexpected status, body: {}",
            $response.text()
        );
    };
}

/// Assert an error response: status plus `{ "error", "status" }` body
#[macro_export]
macro_rules! assert_error_body {
    ($response:expr, $status:expr) => {{
        $crate::assert_status!($response, $status);
        let body: serde_json::Value = $response.json();
        assert_eq!(body["status"], $status.as_u16());
        assert!(body["error"].is_string(), "Missing error message: {}", body);
        body
    }};
}

/// Assert that a string contains a substring
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        assert!(
            $haystack.contains($needle),
            "Expected '{}' to contain '{}'",
            $haystack,
            $needle
        );
    };
}
