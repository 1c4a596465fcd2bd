//! Data Models
//!
//! This module contains the data structures shared by every layer:
//!
//! - `Node` - A portfolio item, plus its create (`NewNode`) and patch (`NodeUpdate`) shapes
//! - `User` / `UserProfile` - Identities and their stored profile documents
//! - `ImageFile` - Image payloads and the acceptance rules applied before upload

mod image;
mod node;
mod user;

pub use image::{ImageFile, UploadedImage, ACCEPTED_IMAGE_TYPES, MAX_IMAGE_BYTES};
pub use node::{ImageChange, NewNode, Node, NodeUpdate, ValidationError, IMMUTABLE_FIELDS};
pub use user::{Credentials, SignUpRequest, User, UserProfile, SESSION_COOKIE_NAME};
