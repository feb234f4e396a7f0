use std::io;
use std::time::Duration;

use crate::app::App;
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};

/// Drive `app` until it asks to quit.
///
/// Redraws only after input or transport traffic changed something. The
/// caller owns entering and leaving full-screen mode.
pub fn run_app<O, D>(
    output: &mut O,
    input: D,
    app: &mut App,
    poll_interval: Duration,
) -> io::Result<()>
where
    O: OutputDriver,
    D: InputDriver,
{
    let mut event_loop = EventLoop::new(input, poll_interval);
    let mut dirty = true;
    event_loop.run(|event| {
        match event {
            None => {
                dirty |= app.tick();
                if dirty {
                    output.draw(|frame| app.render(frame))?;
                    dirty = false;
                }
            }
            Some(event) => dirty |= app.handle_event(&event),
        }
        Ok(if app.should_quit() {
            ControlFlow::Quit
        } else {
            ControlFlow::Continue
        })
    })
}
