use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use nearby_core::{Coordinates, GeolocationProvider, NearbyError};

/// A "device" whose position is whatever the user last typed.
///
/// There is no permission prompt on a terminal, so this never reports
/// `PermissionDenied`; out-of-range coordinates are reported as unavailable.
#[derive(Debug)]
pub struct FixedLocation {
    current: Mutex<Coordinates>,
}

impl FixedLocation {
    pub fn new(at: Coordinates) -> Self {
        Self {
            current: Mutex::new(at),
        }
    }

    /// Moves the device. Takes effect on the next location read.
    pub fn set(&self, at: Coordinates) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

#[async_trait]
impl GeolocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinates, NearbyError> {
        let at = *self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if at.is_valid() {
            Ok(at)
        } else {
            Err(NearbyError::location_unavailable())
        }
    }
}
