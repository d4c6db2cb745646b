pub mod hash;
pub mod jwt;
pub mod password;
pub mod slug;
