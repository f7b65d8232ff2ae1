//! Hand sources — LeapMotion hardware or a mouse-driven simulation.
//!
//! The public interface is [`InputEvent`] delivered over a `mpsc` channel.
//! The app loop is the single consumer, so every frame is handled to
//! completion before the next is looked at.  Whether frames come from real
//! hardware or the simulator makes no difference downstream.

use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use snap_core::landmarks::*;
use snap_core::{CanvasSize, HandFrame, HandSample, Landmark};

// ════════════════════════════════════════════════════════════════════════════
// InputEvent
// ════════════════════════════════════════════════════════════════════════════

/// Everything the app loop reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// One estimator result: zero or more hands.
    Frame(HandFrame),

    /// Manual "force dust effect" control.
    ForceDust,

    /// Manual "force reset" control.
    ForceReset,

    /// The hand source failed; the message is shown as status.
    SourceError(String),

    /// Quit the application.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`InputEvent`]s over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<InputEvent>);
}

/// Spawn a hand source on its own thread, feeding `tx`.
pub fn spawn_hand_source<H: HandSource>(source: H, tx: Sender<InputEvent>) {
    thread::spawn(move || Box::new(source).run(tx));
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Leap joints are millimetres above the device; they are mapped onto the
/// canvas through a fixed interaction box (x ±200 mm, y 80–480 mm) and
/// reordered into the 21-point layout.
#[cfg(feature = "leap")]
pub struct LeapHandSource {
    pub canvas: CanvasSize,
}

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<InputEvent>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                let _ = tx.send(InputEvent::SourceError(format!("LeapC connection: {:?}", e)));
                return;
            }
        };
        if let Err(e) = connection.open() {
            let _ = tx.send(InputEvent::SourceError(format!("LeapMotion device: {:?}", e)));
            return;
        }
        tracing::info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<_> = frame.hands().collect();
                let hands: Vec<HandSample> = hands.iter()
                    .filter_map(|h| leap_hand_sample(h))
                    .collect();
                let out = HandFrame::new(self.canvas.width, self.canvas.height, hands);
                if tx.send(InputEvent::Frame(out)).is_err() { return; }
            }
        }
    }
}

#[cfg(feature = "leap")]
fn leap_hand_sample(hand: &leaprs::Hand) -> Option<HandSample> {
    let digits: Vec<_> = hand.digits().collect();
    if digits.len() < 5 { return None; }

    // Interaction box: x ±200 mm, y 80–480 mm above the device
    let norm = |x: f32, y: f32, z: f32| Landmark::with_depth(
        ((x + 200.0) / 400.0).clamp(0.0, 1.0),
        (1.0 - (y - 80.0) / 400.0).clamp(0.0, 1.0),
        z / 400.0,
    );

    let mut pts = [Landmark::default(); LANDMARK_COUNT];
    let wrist = digits[2].metacarpal().prev_joint();
    pts[WRIST] = norm(wrist.x, wrist.y, wrist.z);
    for (f, digit) in digits.iter().take(5).enumerate() {
        let base = 1 + f * 4;
        let joints = [
            digit.proximal().prev_joint(),
            digit.intermediate().prev_joint(),
            digit.distal().prev_joint(),
            digit.distal().next_joint(),
        ];
        for (j, v) in joints.iter().enumerate() {
            pts[base + j] = norm(v.x, v.y, v.z);
        }
    }
    HandSample::new(pts).ok()
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — mouse/keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw pointer state from the simulation window, sent once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Hand centred on the pointer (normalized), fingers pinched or open.
    Pointer { x: f32, y: f32, pinched: bool },
    /// Pointer outside the canvas, or the hand toggled off.
    Hidden,
}

/// Hand source driven by [`SimInput`] from the visualizer's window.
///
/// The visualizer sends pointer state here; this translator turns it into
/// synthetic 21-point hands, decoupling the window loop from landmark
/// generation exactly the way a real estimator callback would be.
pub struct SimHandSource {
    pub rx:     Receiver<SimInput>,
    pub canvas: CanvasSize,
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<InputEvent>) {
        let (w, h) = (self.canvas.width, self.canvas.height);
        for input in self.rx {
            let frame = match input {
                SimInput::Pointer { x, y, pinched } =>
                    HandFrame::new(w, h, synthetic_hand(x, y, 1.0, pinched).into_iter().collect()),
                SimInput::Hidden => HandFrame::empty(w, h),
            };
            if tx.send(InputEvent::Frame(frame)).is_err() { return; }
        }
    }
}

/// An upright right hand whose knuckle line is centred on `(cx, cy)`.
///
/// Open: thumb splayed left, fingers straight up.  Pinched: the index
/// finger curls so its tip lands on the thumb tip.  `None` for a
/// non-finite centre.
pub fn synthetic_hand(cx: f32, cy: f32, scale: f32, pinched: bool) -> Option<HandSample> {
    let s = scale;
    let at = |dx: f32, dy: f32| Landmark::new((cx + dx * s).clamp(0.0, 1.0), (cy + dy * s).clamp(0.0, 1.0));

    let mut pts = [Landmark::default(); LANDMARK_COUNT];
    pts[WRIST]     = at(0.00, 0.18);
    pts[THUMB_CMC] = at(-0.05, 0.13);
    pts[THUMB_MCP] = at(-0.09, 0.08);
    pts[THUMB_IP]  = at(-0.12, 0.03);
    pts[THUMB_TIP] = at(-0.14, -0.02);

    // Knuckle x offsets and finger lengths: index, middle, ring, pinky
    let fingers = [(-0.06, 0.16), (-0.02, 0.18), (0.02, 0.16), (0.06, 0.12)];
    for (f, &(kx, len)) in fingers.iter().enumerate() {
        let base = INDEX_MCP + f * 4;
        for j in 0..4 {
            pts[base + j] = at(kx, -len * j as f32 / 3.0);
        }
    }

    if pinched {
        let tip = pts[THUMB_TIP];
        pts[INDEX_PIP] = at(-0.10, -0.06);
        pts[INDEX_DIP] = at(-0.13, -0.05);
        pts[INDEX_TIP] = Landmark::new((tip.x + 0.002 * s).min(1.0), tip.y);
    }

    HandSample::new(pts).ok()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use snap_core::distance;
    use std::sync::mpsc;

    const CANVAS: CanvasSize = CanvasSize::new(960, 720);

    #[test]
    fn open_hand_is_wide_open() {
        let h = synthetic_hand(0.5, 0.5, 1.0, false).unwrap();
        assert!(distance(h.thumb_tip(), h.index_tip(), CANVAS) > 50.0);
    }

    #[test]
    fn pinched_hand_is_closed() {
        let h = synthetic_hand(0.5, 0.5, 1.0, true).unwrap();
        assert!(distance(h.thumb_tip(), h.index_tip(), CANVAS) < 20.0);
    }

    #[test]
    fn landmarks_stay_normalized_at_edges() {
        let h = synthetic_hand(0.01, 0.99, 1.0, false).unwrap();
        assert!(h.points().iter().all(|l| (0.0..=1.0).contains(&l.x) && (0.0..=1.0).contains(&l.y)));
    }

    #[test]
    fn non_finite_centre_yields_no_hand() {
        assert!(synthetic_hand(f32::NAN, 0.5, 1.0, false).is_none());
    }

    #[test]
    fn sim_source_translates_pointer_to_frames() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let (tx, rx) = mpsc::channel();
        spawn_hand_source(SimHandSource { rx: sim_rx, canvas: CANVAS }, tx);

        sim_tx.send(SimInput::Pointer { x: 0.5, y: 0.5, pinched: false }).unwrap();
        sim_tx.send(SimInput::Hidden).unwrap();
        drop(sim_tx);

        let events: Vec<InputEvent> = rx.iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], InputEvent::Frame(f) if f.hands.len() == 1));
        assert!(matches!(&events[1], InputEvent::Frame(f) if f.hands.is_empty()));
    }
}
