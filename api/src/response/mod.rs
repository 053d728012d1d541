use serde::Serialize;

/// Envelope for every JSON response:
///
/// ```json
/// {
///   "success": true,
///   "data": { "id": "3b0f..." },
///   "message": "Course created"
/// }
/// ```
///
/// Errors carry `success: false` and usually empty `data`. Rejected course
/// registrations are the exception: their offending ids travel in `data`.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Error response with default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }

    /// Error response that still carries a payload describing the failure.
    pub fn failure(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: message.into(),
        }
    }
}
