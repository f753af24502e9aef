use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{lat_lon::LatLon, meters::Meters};

/// A live location sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub speed_mps: Option<f64>,
    #[serde(default)]
    pub heading_deg: Option<f64>,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Position {
            lat,
            lon,
            speed_mps: None,
            heading_deg: None,
        }
    }

    pub fn lat_lon(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }

    pub fn distance_to(&self, to: &LatLon) -> Meters {
        self.lat_lon().haversine_distance(to)
    }
}

impl From<LatLon> for Position {
    fn from(value: LatLon) -> Self {
        Position::new(value.lat, value.lon)
    }
}

/// Holds the most recent position sample. Latest wins, no history.
///
/// Readers get two paths: [`PositionReader::latest`] for synchronous distance
/// math and [`PositionReader::changed`] to react to new samples.
pub struct PositionStore {
    tx: watch::Sender<Option<Position>>,
}

impl PositionStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn publish(&self, position: Position) {
        self.tx.send_replace(Some(position));
    }

    pub fn latest(&self) -> Option<Position> {
        *self.tx.borrow()
    }

    pub fn reader(&self) -> PositionReader {
        PositionReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for PositionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct PositionReader {
    rx: watch::Receiver<Option<Position>>,
}

impl PositionReader {
    pub fn latest(&self) -> Option<Position> {
        *self.rx.borrow()
    }

    /// Waits for the next published sample. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Position> {
        self.rx.changed().await.ok()?;
        *self.rx.borrow_and_update()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_wins() {
        let store = PositionStore::new();
        let reader = store.reader();
        assert_eq!(reader.latest(), None);

        store.publish(Position::new(10.0, 106.0));
        store.publish(Position::new(10.001, 106.0));

        assert_eq!(reader.latest(), Some(Position::new(10.001, 106.0)));
        assert_eq!(store.latest(), Some(Position::new(10.001, 106.0)));
    }

    #[tokio::test]
    async fn test_changed_sees_new_sample_and_closes() {
        let store = PositionStore::new();
        let mut reader = store.reader();

        store.publish(Position::new(10.0, 106.0));
        assert_eq!(reader.changed().await, Some(Position::new(10.0, 106.0)));

        drop(store);
        assert_eq!(reader.changed().await, None);
    }
}
