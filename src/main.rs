//! Demo: two simulated flexible docking tubes acquire, latch and stow.

use std::path::Path;

use flexdock::geometry::Pose;
use flexdock::host::{CounterpartId, DockingState};
use flexdock::mechanism::{FlexMechanism, MechanismCommand, PersistedState};
use flexdock::options::Options;
use flexdock::sim::{SimAnimator, SimHost, SimPeer, SimRig};
use glam::Vec3;

const TUBE_A: CounterpartId = CounterpartId(1);
const TUBE_B: CounterpartId = CounterpartId(2);

/// Ticks a full extend clip takes.
const CLIP_TICKS: u32 = 30;
/// Closing speed of the two ports, meters per tick.
const CLOSING_SPEED: f32 = 0.02;
/// Separation at which both ports start acquiring.
const ACQUIRE_RANGE: f32 = 3.0;
/// Separation at which the ports latch.
const LATCH_RANGE: f32 = 0.1;
/// Ticks to stay mated before undocking.
const MATED_TICKS: usize = 60;

/// One side of the demo plus the number of its outgoing commands already
/// forwarded to the other side.
struct Side {
    rig: SimRig,
    forwarded: usize,
}

impl Side {
    fn new(options: &Options, connector: Pose) -> Result<Self, String> {
        let mut host = SimHost::new();
        host.connector = Some(connector);
        host.translation_reference = Some(connector);
        host.base = Some(connector);
        host.base_name.clone_from(&options.mechanism.base_transform);
        let mut animator = SimAnimator::for_options(&options.channels, CLIP_TICKS);
        let mechanism = FlexMechanism::start(
            options.clone(),
            &PersistedState::default(),
            &mut host,
            &mut animator,
        )
        .map_err(|e| e.to_string())?;
        Ok(Self {
            rig: SimRig {
                mechanism,
                host,
                animator,
            },
            forwarded: 0,
        })
    }

    fn command(&mut self, command: MechanismCommand) {
        self.rig
            .mechanism
            .execute(command, &mut self.rig.host, &mut self.rig.animator);
    }

    fn snapshot(&self) -> SimPeer {
        SimPeer {
            connector: self.rig.host.connector,
            state: self.rig.host.state.clone(),
            magnets: self.rig.host.magnets,
            flexible_deployed: Some(self.rig.mechanism.is_deployed()),
        }
    }
}

/// Mirror each side into the other's peer table and deliver pending
/// counterpart commands.
fn exchange(a: &mut Side, b: &mut Side) {
    deliver(a, b);
    deliver(b, a);
    let snapshot_a = a.snapshot();
    let snapshot_b = b.snapshot();
    a.rig.host.add_peer(TUBE_B, snapshot_b);
    b.rig.host.add_peer(TUBE_A, snapshot_a);
}

fn deliver(from: &mut Side, to: &mut Side) {
    let sent = from.rig.host.sent();
    for (_, command) in &sent[from.forwarded..] {
        to.rig.host.magnets = command.apply(to.rig.host.magnets);
    }
    from.forwarded = sent.len();
}

fn set_states(a: &mut Side, b: &mut Side, state_a: DockingState, state_b: DockingState) {
    if a.rig.host.state != state_a {
        log::info!("tube A: {} -> {}", a.rig.host.state, state_a);
        a.rig.host.state = state_a;
    }
    if b.rig.host.state != state_b {
        log::info!("tube B: {} -> {}", b.rig.host.state, state_b);
        b.rig.host.state = state_b;
    }
}

/// Move every transform of a host rigidly.
fn shift(host: &mut SimHost, delta: Vec3) {
    for pose in [
        &mut host.connector,
        &mut host.base,
        &mut host.translation_reference,
    ]
    .into_iter()
    .flatten()
    {
        pose.position += delta;
    }
}

fn log_side(name: &str, side: &Side) {
    let t = side.rig.mechanism.telemetry(&side.rig.host);
    log::info!(
        "{name}: {:<18} theta {:>7.2}° dist {:.3}m frames tx {:>3} ty {:>3} rx {:>3} ry {:>3} force {:.2}",
        t.status.to_string(),
        t.theta_degrees,
        t.distance,
        t.current.translate_x,
        t.current.translate_y,
        t.current.rotate_x,
        t.current.rotate_y,
        t.magnetic_force,
    );
}

fn run(options: &Options) -> Result<(), String> {
    let mut a = Side::new(options, Pose::looking(Vec3::ZERO, Vec3::Z, Vec3::Y))?;
    let start_b = Vec3::new(0.15, -0.2, 6.0);
    let mut b = Side::new(options, Pose::looking(start_b, -Vec3::Z, Vec3::Y))?;
    a.rig.host.attach(TUBE_B);
    b.rig.host.attach(TUBE_A);
    exchange(&mut a, &mut b);

    log::info!("{}", a.rig.mechanism.info().replace('\n', ", "));
    a.command(MechanismCommand::Deploy);
    b.command(MechanismCommand::Deploy);

    let mut mated_for = 0;
    for tick in 0_usize.. {
        let separation = a.rig.host.connector.map_or(0.0, |c| c.position.z)
            - b.rig.host.connector.map_or(0.0, |c| c.position.z);
        let separation = separation.abs();

        if separation <= LATCH_RANGE {
            if mated_for == 0 {
                log::info!("latched at tick {tick}");
            }
            set_states(
                &mut a,
                &mut b,
                DockingState::DockedDocker,
                DockingState::DockedDockee,
            );
            mated_for += 1;
        } else if separation <= ACQUIRE_RANGE {
            // Only the first side to see the other acquires as docker; the
            // handshake sorts out the rest.
            let state_a = if a.rig.host.state == DockingState::Ready {
                DockingState::Acquire
            } else {
                a.rig.host.state.clone()
            };
            let state_b = if b.rig.host.state == DockingState::Ready {
                DockingState::AcquireDockee
            } else {
                b.rig.host.state.clone()
            };
            set_states(&mut a, &mut b, state_a, state_b);
        }

        if separation > LATCH_RANGE {
            let drift = b.rig.host.connector.map_or(0.0, |c| c.position.x);
            shift(
                &mut b.rig.host,
                Vec3::new(-drift * 0.005, 0.0, -CLOSING_SPEED),
            );
        }

        a.rig.tick();
        b.rig.tick();
        exchange(&mut a, &mut b);

        if tick % 20 == 0 {
            log_side("A", &a);
            log_side("B", &b);
        }

        if mated_for >= MATED_TICKS {
            break;
        }
    }

    log::info!("undocking and stowing");
    set_states(&mut a, &mut b, DockingState::Ready, DockingState::Ready);
    a.rig.host.detach();
    b.rig.host.detach();
    a.command(MechanismCommand::Retract);
    b.command(MechanismCommand::Retract);
    let stowed = a
        .rig
        .run_until(CLIP_TICKS as usize * 2, |r| !r.mechanism.is_moving());
    b.rig.run(CLIP_TICKS as usize * 2);
    log_side("A", &a);
    log_side("B", &b);
    log::info!("stowed after {} ticks", stowed.unwrap_or_default());

    let saved = a.rig.mechanism.persisted();
    let text = saved.to_toml().map_err(|e| e.to_string())?;
    log::debug!("tube A persisted state:\n{text}");
    Ok(())
}

fn main() {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = run(&options) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
