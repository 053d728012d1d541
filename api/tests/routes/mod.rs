mod announcements_test;
mod auth_test;
mod courses_test;
mod flow_test;
mod health_test;
mod users_test;
