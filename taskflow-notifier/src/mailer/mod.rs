/// Mail transport
///
/// The notifier delivers reminders through the [`Mailer`] trait:
///
/// - `transport`: trait, message type, and error type
/// - `http`: delivery via an HTTP mail relay (production)
/// - `mock`: recording mailer with failure injection (tests and demos)

pub mod http;
pub mod mock;
pub mod transport;

pub use http::HttpMailer;
pub use mock::MockMailer;
pub use transport::{MailError, MailMessage, Mailer};
