pub mod audio;
pub mod images;

use crate::deck::Deck;
use audio::{ExternalPlayer, MusicPlayer, NoMusic};

/// Pick a music player for the deck, honouring the user's player settings.
pub fn music_for(
    deck: &Deck,
    program: Option<&str>,
    args: Option<&[String]>,
) -> Box<dyn MusicPlayer> {
    let Some(track) = deck.music_path() else {
        return Box::new(NoMusic);
    };
    match program {
        Some(program) => {
            let args = args.map(<[String]>::to_vec).unwrap_or_else(|| {
                audio::DEFAULT_PLAYER_ARGS
                    .iter()
                    .map(|a| a.to_string())
                    .collect()
            });
            Box::new(ExternalPlayer::new(program, args, track))
        }
        None => Box::new(ExternalPlayer::with_defaults(track)),
    }
}
