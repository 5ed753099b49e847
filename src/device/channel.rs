//! Abstract device-bound message link. The sync fan-out publishes through
//! this trait; the concrete transport (broker bridge, serial gateway) lives
//! outside the engine.

pub const TOPIC_SYNC_DATA: &str = "ponto/sync/data";
pub const TOPIC_SYNC_END: &str = "ponto/sync/end";

pub trait DeviceChannel {
    async fn publish(&self, topic: &str, payload: String) -> anyhow::Result<()>;
}

/// Default channel for deployments where the transport bridge tails the log
/// stream out-of-process.
#[derive(Clone, Default)]
pub struct LogChannel;

impl DeviceChannel for LogChannel {
    async fn publish(&self, topic: &str, payload: String) -> anyhow::Result<()> {
        log::debug!("publish {topic}: {payload}");
        Ok(())
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Records every publish for assertions.
    #[derive(Default)]
    pub struct RecordingChannel {
        pub messages: Mutex<Vec<(String, String)>>,
    }

    impl DeviceChannel for RecordingChannel {
        async fn publish(&self, topic: &str, payload: String) -> anyhow::Result<()> {
            self.messages
                .lock()
                .unwrap()
                .push((topic.to_string(), payload));
            Ok(())
        }
    }
}
