//! Integration test common infrastructure.
//!
//! Provides a scripted fake broker and an in-process peer whose console is
//! captured, so tests can drive both ends of a session.

pub mod broker;
pub mod peer;

#[allow(unused_imports)]
pub use broker::{BrokerConn, TestBroker};
#[allow(unused_imports)]
pub use peer::TestPeer;
