use cubeflow::sequencer::{CubeFrame, Sequencer, SequencerEvent};
use instant::Duration;

/// Frame cadence the drivers tick at. Deliberately not a divisor of the
/// default 100 ms spawn delay, so spawns land between ticks like they do
/// under a real display refresh.
pub const TICK: Duration = Duration::from_millis(10);

/// Everything observed while driving a sequencer to completion.
pub struct SequenceLog {
    /// Number of ticks issued, including the one that completed.
    pub ticks: usize,
    /// `(index, is_original)` in activation order.
    pub activations: Vec<(usize, bool)>,
    /// `filler_count` payloads of every `SequenceComplete` seen.
    pub completions: Vec<usize>,
    /// Frames reported by the final tick.
    pub final_frames: Vec<CubeFrame>,
}

/// Tick `sequencer` at [`TICK`] cadence until it reports complete, then a few
/// more times to catch anything that should not fire twice.
///
/// Panics if the sequence has not completed after `max_ticks` ticks, so a
/// stalled state machine fails the test instead of hanging it.
pub fn run_to_completion(sequencer: &mut Sequencer, max_ticks: usize) -> SequenceLog {
    let mut log = SequenceLog {
        ticks: 0,
        activations: Vec::new(),
        completions: Vec::new(),
        final_frames: Vec::new(),
    };

    let mut tick_index: u32 = 0;
    let mut drain = 5;
    loop {
        assert!(
            (tick_index as usize) < max_ticks,
            "sequence did not complete within {max_ticks} ticks, phase {:?}",
            sequencer.phase()
        );
        let update = sequencer.tick(TICK * tick_index);
        tick_index += 1;
        log.ticks += 1;
        for event in &update.events {
            match *event {
                SequencerEvent::TaskActivated { index, is_original } => {
                    log.activations.push((index, is_original));
                }
                SequencerEvent::SequenceComplete { filler_count } => {
                    log.completions.push(filler_count);
                }
            }
        }
        log.final_frames = update.frames;
        if sequencer.is_complete() {
            if drain == 0 {
                break;
            }
            drain -= 1;
        }
    }

    log
}
