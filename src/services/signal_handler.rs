//! Process signal handling.
//!
//! SIGINT does not terminate the editor: it only raises a flag the main loop
//! consumes between reads to abandon whatever input was pending. While a line
//! is being read the terminal is in raw mode and Ctrl-C arrives as a key
//! instead. SIGTERM and SIGHUP restore the terminal and exit with
//! `128 + signal`.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPT_PENDING: AtomicBool = AtomicBool::new(false);

/// Consume a pending SIGINT, returning whether one arrived.
pub fn take_interrupt() -> bool {
    INTERRUPT_PENDING.swap(false, Ordering::SeqCst)
}

/// Raise the interrupt flag as if SIGINT had been delivered.
pub fn raise_interrupt() {
    INTERRUPT_PENDING.store(true, Ordering::SeqCst);
}

/// Install SIGINT, SIGTERM and SIGHUP handlers.
/// On non-Unix platforms this is a no-op.
pub fn install_signal_handlers() {
    #[cfg(unix)]
    unix::install();
}

#[cfg(unix)]
mod unix {
    use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
    use std::sync::atomic::{AtomicBool, Ordering};

    static TERMINATING: AtomicBool = AtomicBool::new(false);

    pub fn install() {
        extern "C" fn interrupt_handler(_: libc::c_int) {
            super::raise_interrupt();
        }

        extern "C" fn termination_handler(signum: libc::c_int) {
            // Only handle the first signal
            if TERMINATING.swap(true, Ordering::SeqCst) {
                return;
            }
            tracing::warn!("Received signal {}, restoring terminal and exiting", signum);
            crate::services::terminal_modes::emergency_cleanup();
            std::process::exit(128 + signum);
        }

        let interrupt = SigAction::new(
            SigHandler::Handler(interrupt_handler),
            SaFlags::SA_RESTART,
            SigSet::empty(),
        );
        let terminate = SigAction::new(
            SigHandler::Handler(termination_handler),
            SaFlags::empty(),
            SigSet::empty(),
        );

        unsafe {
            if let Err(e) = sigaction(Signal::SIGINT, &interrupt) {
                tracing::error!("Failed to set SIGINT handler: {}", e);
            }
            for signal in [Signal::SIGTERM, Signal::SIGHUP] {
                if let Err(e) = sigaction(signal, &terminate) {
                    tracing::error!("Failed to set {} handler: {}", signal, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_flag_is_consumed_once() {
        raise_interrupt();
        assert!(take_interrupt());
        assert!(!take_interrupt());
    }
}
