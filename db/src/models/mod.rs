pub mod announcement;
pub mod class;
pub mod course;
pub mod registration;
pub mod submission;
pub mod unread_announcement;
pub mod user;

pub use announcement::Entity as Announcement;
pub use class::Entity as Class;
pub use course::Entity as Course;
pub use registration::Entity as Registration;
pub use submission::Entity as Submission;
pub use unread_announcement::Entity as UnreadAnnouncement;
pub use user::Entity as User;
