use crate::host::{
    Counterpart, CounterpartCommand, CounterpartId, MagneticParameters,
};
use crate::options::MagnetOptions;

/// Commands the coordinator wants delivered, in order.
pub type Outbox = Vec<(CounterpartId, CounterpartCommand)>;

/// Remembers the paired port's original attraction parameters so they can
/// be put back when the pairing ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MagnetCoordinator {
    cached: Option<(CounterpartId, MagneticParameters)>,
}

impl MagnetCoordinator {
    /// Fresh coordinator with nothing cached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile with the current pairing and return the commands to send.
    ///
    /// A newly seen counterpart is cached and, while deployed, switched to
    /// the active parameters. A previously cached counterpart that is no
    /// longer paired gets its original parameters back.
    pub fn observe(
        &mut self,
        counterpart: Option<&Counterpart>,
        deployed: bool,
        magnets_enabled: bool,
        active: &MagnetOptions,
    ) -> Outbox {
        let mut outbox = Outbox::new();
        let Some(other) = counterpart else {
            if let Some((id, params)) = self.cached.take() {
                log::debug!("counterpart {id:?} gone, restoring its magnets");
                outbox.push((id, CounterpartCommand::SetMagnets(params)));
            }
            return outbox;
        };

        if self.cached.is_some_and(|(id, _)| id == other.id) {
            return outbox;
        }

        if let Some((previous, params)) =
            self.cached.replace((other.id, other.magnets))
        {
            log::debug!("counterpart swapped, restoring {previous:?}");
            outbox.push((previous, CounterpartCommand::SetMagnets(params)));
        }
        log::debug!("caching magnets of counterpart {:?}", other.id);

        if deployed {
            outbox.push((
                other.id,
                CounterpartCommand::SetMagnets(active.active(magnets_enabled)),
            ));
        } else if !magnets_enabled {
            outbox.push((
                other.id,
                CounterpartCommand::SetForceTorque {
                    force: 0.0,
                    torque: 0.0,
                },
            ));
        }
        outbox
    }
}
