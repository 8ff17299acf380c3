//! KDS message channel

pub mod bus;

pub use bus::{
    ChannelError, DEFAULT_CHANNEL_CAPACITY, KdsChannel, KdsEnvelope, KdsSubscriber,
    KdsSubscription,
};
