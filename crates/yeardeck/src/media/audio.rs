use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

pub const DEFAULT_PLAYER: &str = "ffplay";
pub const DEFAULT_PLAYER_ARGS: &[&str] = &["-nodisp", "-loop", "0", "-loglevel", "quiet"];

/// Background music track control.
pub trait MusicPlayer {
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;

    /// Whether the track is still audible after a successful `play`.
    fn is_playing(&mut self) -> bool;

    fn is_available(&self) -> bool {
        true
    }
}

/// Used when a deck has no music track.
#[derive(Debug, Default)]
pub struct NoMusic;

impl MusicPlayer for NoMusic {
    fn play(&mut self) -> Result<()> {
        anyhow::bail!("No music track configured for this deck")
    }

    fn pause(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_playing(&mut self) -> bool {
        false
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Loops a track through an external command-line player.
/// Pausing stops the player process; playing again restarts the track.
#[derive(Debug)]
pub struct ExternalPlayer {
    program: String,
    args: Vec<String>,
    track: PathBuf,
    child: Option<Child>,
}

impl ExternalPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>, track: PathBuf) -> Self {
        Self {
            program: program.into(),
            args,
            track,
            child: None,
        }
    }

    pub fn with_defaults(track: PathBuf) -> Self {
        Self::new(
            DEFAULT_PLAYER,
            DEFAULT_PLAYER_ARGS.iter().map(|a| a.to_string()).collect(),
            track,
        )
    }

    fn is_running(&mut self) -> bool {
        match self.child.as_mut().map(|c| c.try_wait()) {
            Some(Ok(None)) => true,
            Some(Ok(Some(status))) => {
                log::debug!("music player exited with {status}");
                self.child = None;
                false
            }
            Some(Err(e)) => {
                log::warn!("Could not query music player: {e}");
                false
            }
            None => false,
        }
    }
}

impl MusicPlayer for ExternalPlayer {
    fn play(&mut self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }
        if !self.track.exists() {
            anyhow::bail!("Music track not found: {}", self.track.display());
        }
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.track)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start music player '{}'", self.program))?;
        log::info!("Playing {} with {}", self.track.display(), self.program);
        self.child = Some(child);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            child.kill().context("Failed to stop music player")?;
            let _ = child.wait();
            log::debug!("music player stopped");
        }
        Ok(())
    }

    fn is_playing(&mut self) -> bool {
        self.is_running()
    }

    /// The track must exist and the player must start.
    fn is_available(&self) -> bool {
        self.track.exists()
            && Command::new(&self.program)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .is_ok()
    }
}

impl Drop for ExternalPlayer {
    fn drop(&mut self) {
        if let Err(e) = self.pause() {
            log::warn!("{e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_music_refuses_to_play() {
        let mut player = NoMusic;
        assert!(player.play().is_err());
        assert!(player.pause().is_ok());
        assert!(!player.is_available());
    }

    #[test]
    fn test_missing_track_is_an_error() {
        let mut player = ExternalPlayer::with_defaults(PathBuf::from("/nonexistent/track.mp3"));
        let err = player.play().unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(player.pause().is_ok());
        assert!(!player.is_available());
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let track = std::env::current_exe().unwrap();
        let mut player = ExternalPlayer::new("yeardeck-no-such-player", Vec::new(), track);
        assert!(player.play().is_err());
        assert!(!player.is_available());
    }

    #[test]
    fn test_player_that_exits_is_not_playing() {
        let track = std::env::current_exe().unwrap();
        let mut player = ExternalPlayer::new("false", Vec::new(), track);
        player.play().unwrap();
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while player.is_playing() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        assert!(!player.is_playing());
        assert!(player.pause().is_ok());
    }
}
