pub mod oracle;
pub mod raycast;
