//! Energy production and spending.

use crate::model::Reactor;

use super::heat::add_heat;

/// One reactor tick. Consumption since the last tick is metered first:
/// a draw rate over the design's energy-per-minute threshold heats the
/// reactor. Then the charge tops up, capped at the design maximum.
pub fn update_reactor(reactor: &mut Reactor, delta_seconds: f64) {
    if delta_seconds > 0.0 {
        let energy_per_minute = reactor.spent_since_update / delta_seconds * 60.0;
        if energy_per_minute > reactor.design.energy_heat_epm_threshold {
            let heat = reactor.design.energy_heat * delta_seconds;
            add_heat(reactor, heat);
        }
    }
    reactor.spent_since_update = 0.0;
    let charged = reactor.energy + reactor.energy_per_second() * delta_seconds;
    reactor.energy = charged.min(reactor.design.max_energy);
}

/// Attempts to draw energy from the reactor. An empty battery denies
/// silently; a negative request is a caller bug, logged and denied.
pub fn try_spend_energy(reactor: &mut Reactor, amount: f64) -> bool {
    if amount < 0.0 {
        log::warn!("trying to spend negative energy: {}", amount);
        return false;
    }
    if reactor.energy < amount {
        return false;
    }
    reactor.energy -= amount;
    reactor.spent_since_update += amount;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recharge_caps_at_design_max() {
        let mut reactor = Reactor::default();
        reactor.energy = reactor.design.max_energy - 1.0;
        update_reactor(&mut reactor, 10.0);
        assert_eq!(reactor.energy, reactor.design.max_energy);
    }

    #[test]
    fn test_recharge_scales_with_efficiency() {
        let mut reactor = Reactor::default();
        reactor.energy = 0.0;
        reactor.efficiency_factor = 0.5;
        update_reactor(&mut reactor, 2.0);
        assert_eq!(reactor.energy, 5.0);
    }

    #[test]
    fn test_spend_is_denied_beyond_charge() {
        let mut reactor = Reactor::default();
        reactor.energy = 10.0;
        assert!(try_spend_energy(&mut reactor, 10.0));
        assert_eq!(reactor.energy, 0.0);
        assert!(!try_spend_energy(&mut reactor, 0.1));
        assert_eq!(reactor.energy, 0.0);
    }

    #[test]
    fn test_negative_spend_is_denied() {
        let mut reactor = Reactor::default();
        assert!(!try_spend_energy(&mut reactor, -5.0));
        assert_eq!(reactor.energy, reactor.design.max_energy);
    }

    #[test]
    fn test_sustained_draw_heats_the_reactor() {
        let mut reactor = Reactor::default();
        // 5 energy in a 1s tick is 300 per minute, over the 240 threshold
        assert!(try_spend_energy(&mut reactor, 5.0));
        update_reactor(&mut reactor, 1.0);
        assert_eq!(reactor.heat, reactor.design.energy_heat);
        assert_eq!(reactor.spent_since_update, 0.0);

        // a gentle draw stays cool
        let mut idle = Reactor::default();
        assert!(try_spend_energy(&mut idle, 1.0));
        update_reactor(&mut idle, 1.0);
        assert_eq!(idle.heat, 0.0);
    }
}
