//! Connection bookkeeping for the network link and the broker session.
//!
//! The session task feeds observed events in and acts on the returned step;
//! the policy itself (what to try next, when to pause) lives here, where a
//! test can drive it with scripted events. Retry is unbounded: there is no
//! attempt cap and no backoff, only the fixed pause after a refusal.

/// Where the connection currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    /// Waiting out the fixed pause before the next attempt.
    Disconnected,
    /// Waiting for the network interface to come up.
    ConnectingNetwork,
    /// Network is up; the broker handshake is due.
    ConnectingSession,
    Connected,
}

#[derive(Clone, Copy, Debug)]
pub enum LinkEvent {
    RetryElapsed,
    NetworkUp,
    NetworkLost,
    SessionOpened,
    SessionRefused,
    SessionLost,
}

/// What the driver should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStep {
    Pause,
    AwaitNetwork,
    Handshake,
    Poll,
}

pub struct Link {
    state: LinkState,
}

impl Link {
    /// A fresh link goes straight to waiting for the network.
    pub const fn new() -> Self {
        Link {
            state: LinkState::ConnectingNetwork,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn step(&self) -> LinkStep {
        match self.state {
            LinkState::Disconnected => LinkStep::Pause,
            LinkState::ConnectingNetwork => LinkStep::AwaitNetwork,
            LinkState::ConnectingSession => LinkStep::Handshake,
            LinkState::Connected => LinkStep::Poll,
        }
    }

    pub fn on(&mut self, event: LinkEvent) {
        use LinkEvent::*;
        use LinkState::*;
        self.state = match (self.state, event) {
            // A dropped interface preempts everything else.
            (_, NetworkLost) => ConnectingNetwork,
            (Disconnected, RetryElapsed) => ConnectingNetwork,
            (ConnectingNetwork, NetworkUp) => ConnectingSession,
            (ConnectingSession, SessionOpened) => Connected,
            // A refused handshake waits out the retry pause.
            (ConnectingSession, SessionRefused) => Disconnected,
            // A lost session retries immediately while the network is up.
            (Connected, SessionLost) => ConnectingSession,
            // Stale events don't move the machine.
            (state, _) => state,
        };
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LinkEvent::*;
    use LinkState::*;

    #[test]
    fn connects_through_network_then_session() {
        let mut link = Link::new();
        assert_eq!(link.step(), LinkStep::AwaitNetwork);
        link.on(NetworkUp);
        assert_eq!(link.step(), LinkStep::Handshake);
        link.on(SessionOpened);
        assert_eq!(link.state(), Connected);
        assert_eq!(link.step(), LinkStep::Poll);
    }

    #[test]
    fn refused_handshakes_loop_through_the_pause_forever() {
        let mut link = Link::new();
        link.on(NetworkUp);
        for _ in 0..100 {
            link.on(SessionRefused);
            assert_eq!(link.step(), LinkStep::Pause);
            link.on(RetryElapsed);
            assert_eq!(link.step(), LinkStep::AwaitNetwork);
            link.on(NetworkUp);
            assert_eq!(link.step(), LinkStep::Handshake);
        }
    }

    #[test]
    fn a_lost_session_retries_without_the_pause() {
        let mut link = Link::new();
        link.on(NetworkUp);
        link.on(SessionOpened);
        link.on(SessionLost);
        assert_eq!(link.state(), ConnectingSession);
        assert_eq!(link.step(), LinkStep::Handshake);
    }

    #[test]
    fn network_loss_preempts_every_state() {
        for setup in [
            &[][..],
            &[NetworkUp][..],
            &[NetworkUp, SessionOpened][..],
            &[NetworkUp, SessionRefused][..],
        ] {
            let mut link = Link::new();
            for &event in setup {
                link.on(event);
            }
            link.on(NetworkLost);
            assert_eq!(link.state(), ConnectingNetwork);
        }
    }

    #[test]
    fn stale_events_leave_the_state_alone() {
        let mut link = Link::new();
        link.on(SessionLost);
        link.on(RetryElapsed);
        assert_eq!(link.state(), ConnectingNetwork);
        link.on(NetworkUp);
        link.on(NetworkUp);
        assert_eq!(link.state(), ConnectingSession);
    }
}
