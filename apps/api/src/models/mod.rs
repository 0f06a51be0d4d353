pub mod feedback;
pub mod question;
pub mod report;
