//! The interactive operator loop.
//!
//! Deliberately dumb: read a line, hand it to the sequencer, print what
//! happened. `q` quits; anything that is not a 4-character square pair is
//! rejected before the hardware hears about it. Errors never exit the loop —
//! the channels stay open for the next move.

use std::io::{BufRead, Write};

use anyhow::Result;

use gambit_board::PieceMove;
use gambit_engine::{MotionSequencer, SequenceError};
use gambit_link::{CancelToken, Channel};

use crate::output;

pub fn run<A, G>(
    input: impl BufRead,
    out: &mut impl Write,
    seq: &mut MotionSequencer<A, G>,
    cancel: &CancelToken,
    json: bool,
) -> Result<()>
where
    A: Channel,
    G: Channel,
{
    writeln!(out, "Gambit ready. Enter a move like e2e4, or q to quit.")?;
    let mut lines = input.lines();
    loop {
        write!(out, "move: ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("q") {
            break;
        }
        let mv: PieceMove = match trimmed.parse() {
            Ok(mv) => mv,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        match seq.transfer(&mv) {
            Ok(report) => output::emit(out, &report, json)?,
            Err(SequenceError::Cancelled { step }) => {
                writeln!(out, "Cancelled at {step}; ready for the next move.")?;
                cancel.reset();
            }
            Err(e) => writeln!(out, "Transfer failed: {e}")?,
        }
    }
    writeln!(out, "Bye.")?;
    Ok(())
}
