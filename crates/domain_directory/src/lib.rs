//! Directory Domain
//!
//! Read-side views of the parties a claim touches: customers, policies, and
//! the adjuster pool, each served by a remote directory this system only
//! queries. The customer notification gateway lives here too, since every
//! message this system sends goes to a customer on file.
//!
//! Customers are cached by id through [`CustomerLookupService`]; policies and
//! adjusters are looked up per operation. All remote access goes through the
//! port traits in [`ports`], so the services are testable against the mock
//! adapters without a network.

pub mod adjuster;
pub mod customer;
pub mod error;
pub mod policy;
pub mod ports;
pub mod services;

pub use adjuster::{Adjuster, EmploymentType, SpecializationArea};
pub use customer::Customer;
pub use error::DirectoryError;
pub use policy::Policy;
pub use ports::{
    AdjusterDirectoryPort, CustomerDirectoryPort, NotificationPort, PolicyDirectoryPort,
};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{
    MockAdjusterDirectory, MockCustomerDirectory, MockNotificationGateway, MockPolicyDirectory,
};
pub use services::{
    CustomerLookupService, NotificationOutcome, NotificationService, PolicyLookupService,
};
