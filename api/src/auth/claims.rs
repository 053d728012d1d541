use serde::{Deserialize, Serialize};

/// Session claims. `sub` is the user id; `admin` marks teachers.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub admin: bool,
}

#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
