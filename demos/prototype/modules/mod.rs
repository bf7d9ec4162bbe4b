pub mod account;
pub mod health;
pub mod onboarding;
pub mod reminders;
pub mod scheduler;
