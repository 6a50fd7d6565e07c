//! Channel-based data source.
//!
//! Receives work item tables via a tokio watch channel, for programs that
//! embed the viewer and push rows rather than writing files.

use sprintwatch_core::RawTable;
use tokio::sync::watch;

use super::TableSource;

/// A data source that receives tables via a channel.
///
/// A table without headers is treated as "nothing yet" and never surfaces
/// from [`poll`](TableSource::poll).
///
/// # Example
///
/// ```
/// use sprintwatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("tracker sync");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<RawTable>,
    description: String,
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - Where the tables come from, shown in the UI
    pub fn new(receiver: watch::Receiver<RawTable>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending tables to a ChannelSource.
    pub fn create(source_description: &str) -> (watch::Sender<RawTable>, Self) {
        let (tx, rx) = watch::channel(RawTable::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl TableSource for ChannelSource {
    fn poll(&mut self) -> Option<RawTable> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            let table = self.receiver.borrow_and_update().clone();
            (!table.headers.is_empty()).then_some(table)
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }

    fn invalidate(&mut self) {
        self.receiver.mark_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprintwatch_core::RawValue;

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Placeholder table is swallowed
        assert!(source.poll().is_none());
        assert!(source.poll().is_none());

        let mut table = RawTable::new(vec!["Sprint".into(), "Story Points".into()]);
        table.push_row(vec![RawValue::text("S1"), RawValue::Number(3.0)]);
        tx.send(table).unwrap();

        let received = source.poll().unwrap();
        assert_eq!(received.len(), 1);
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("tracker");
        assert_eq!(source.description(), "channel: tracker");
        assert!(source.error().is_none());
    }
}
