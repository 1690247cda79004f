use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use lyric_midi_gen::compose::{compose, MelodyRequest};
use lyric_midi_gen::config::{LYRICS_DIR, OUTPUT_DIR};
use lyric_midi_gen::llm::GeminiClient;
use lyric_midi_gen::lyrics::{default_lyrics_name, generate_song, save_lyrics};
use lyric_midi_gen::syllables::HeuristicEstimator;

#[derive(Debug, Parser)]
#[command(
    name = "lyric-midi-gen",
    version,
    about = "Genre-driven lyrics and syllable-mapped MIDI melodies"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Map a lyrics file onto a melody and write a .mid file
    Melody {
        /// Lyrics .txt file
        #[arg(short, long)]
        lyrics: PathBuf,

        /// Genre (bhangra, pop, jazz, rock; anything else uses a generic profile)
        #[arg(short, long)]
        genre: String,

        /// RNG seed (same seed => same MIDI); random when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory
        #[arg(long, default_value = OUTPUT_DIR)]
        out_dir: PathBuf,

        /// Output file name (defaults to <genre>_melody.mid)
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Predict a mood and write lyrics with Gemini (needs GEMINI_API_KEY)
    Lyrics {
        #[arg(short, long)]
        genre: String,

        /// Comma-separated themes
        #[arg(short, long)]
        keywords: String,

        /// Save the lyrics to a file
        #[arg(long, default_value_t = false)]
        save: bool,

        /// File name when saving (defaults to <genre>_<timestamp>.txt)
        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value = LYRICS_DIR)]
        lyrics_dir: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Melody {
            lyrics,
            genre,
            seed,
            out_dir,
            out,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            tracing::info!(seed, "seeding melody generator");
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let mut request = MelodyRequest::new(lyrics, genre).with_out_dir(out_dir);
            if let Some(out) = out {
                request = request.with_filename(out);
            }

            let composition = compose(&request, &HeuristicEstimator, &mut rng)?;
            eprintln!(
                "Wrote {} ({} notes, {} BPM, seed {seed})",
                composition.midi.path.display(),
                composition.midi.emitted,
                composition.config.tempo
            );
        }

        Command::Lyrics {
            genre,
            keywords,
            save,
            name,
            lyrics_dir,
        } => {
            let client = GeminiClient::from_env()?;
            tracing::info!(model = client.model(), "generating song");
            let song = generate_song(&client, &genre, &keywords).await?;

            println!("Mood: {}\n", song.mood);
            println!("{}", song.lyrics);

            if save {
                let name = name.unwrap_or_else(|| default_lyrics_name(&genre));
                let path = save_lyrics(&lyrics_dir, &name, &song.lyrics)?;
                eprintln!("Saved {}", path.display());
            }
        }
    }

    Ok(())
}
