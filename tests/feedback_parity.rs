#![cfg(not(target_arch = "wasm32"))]

use fx_wasm::feedback::{FeedbackPair, Role};
use proptest::prelude::*;

/// Runs `frames` frames of a two-pair chain the way the flowmap effect does:
/// write the flow pair, swap, write the display pair from the new flow,
/// swap.
fn run(frames: u64) -> (FeedbackPair<u64>, FeedbackPair<u64>) {
    let mut flow = FeedbackPair::new(0, 0);
    let mut display = FeedbackPair::new(0, 0);
    for frame in 1..=frames {
        *flow.write_mut() = *flow.read() + 1;
        flow.swap();
        *display.write_mut() = *flow.read() * 10 + frame % 2;
        display.swap();
    }
    (flow, display)
}

proptest! {
    #[test]
    fn roles_follow_frame_parity(frames in 0u64..500) {
        let (flow, display) = run(frames);
        let expected = if frames % 2 == 0 { Role::Read } else { Role::Write };
        prop_assert_eq!(flow.role(0), expected);
        prop_assert_eq!(display.role(0), expected);
        prop_assert_eq!(flow.swaps(), frames);
        prop_assert_eq!(display.swaps(), frames);
    }

    #[test]
    fn each_frame_reads_previous_output(frames in 1u64..500) {
        let (flow, display) = run(frames);
        prop_assert_eq!(*flow.read(), frames);
        prop_assert_eq!(*display.read(), frames * 10 + frames % 2);
    }
}

#[test]
fn even_frames_restore_original_roles() {
    let (flow, _) = run(2);
    assert_eq!(flow.read_index(), 0);
    let (flow, _) = run(3);
    assert_eq!(flow.read_index(), 1);
}
