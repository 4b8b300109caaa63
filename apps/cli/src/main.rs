use std::collections::VecDeque;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use shared::domain::Decision;
use swipe_core::{
    load_settings, CataasItemSource, FallbackItems, ItemSource, PointerOutcome, PointerSignal,
    SessionController, SessionEvent, Sharer, Summary,
};
use tracing_subscriber::EnvFilter;

/// Plays one cat swipe session without a window.
#[derive(Parser, Debug)]
struct Args {
    /// Cards per session (overrides TOTAL_ITEMS).
    #[arg(long)]
    total: Option<usize>,
    #[arg(long)]
    api_url: Option<String>,
    /// Skip the cat API and play on the local fallback batch.
    #[arg(long)]
    offline: bool,
    /// Comma separated like/dislike/cancel, applied after any gestures.
    #[arg(long, value_delimiter = ',')]
    decisions: Vec<Decision>,
    /// Drag traces such as "0,40,90,110;0,-150": press at the first x,
    /// move through the rest, release.
    #[arg(long)]
    gestures: Option<String>,
    #[arg(long)]
    json: bool,
    /// Copy the summary line to the clipboard.
    #[arg(long)]
    share: bool,
}

fn parse_gestures(raw: &str) -> Result<Vec<Vec<f32>>> {
    raw.split(';')
        .map(str::trim)
        .filter(|trace| !trace.is_empty())
        .map(|trace| {
            let points = trace
                .split(',')
                .map(|x| {
                    x.trim()
                        .parse::<f32>()
                        .with_context(|| format!("invalid gesture coordinate '{x}'"))
                })
                .collect::<Result<Vec<_>>>()?;
            if points.is_empty() {
                return Err(anyhow!("empty gesture trace"));
            }
            Ok(points)
        })
        .collect()
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::Presented {
            item,
            position,
            total,
        } => println!("card {}/{}: {} ({})", position + 1, total, item.id, item.image_ref),
        SessionEvent::CardReset => println!("  card returned to center"),
        SessionEvent::Finished(_) => println!("session complete"),
    }
}

fn play_gesture(controller: &mut SessionController, trace: &[f32]) -> Result<Option<SessionEvent>> {
    let Some((&press, moves)) = trace.split_first() else {
        return Ok(None);
    };
    controller.handle_pointer(PointerSignal::Press(press))?;
    for &x in moves {
        if let PointerOutcome::Dragged(feedback) =
            controller.handle_pointer(PointerSignal::Move(x))?
        {
            tracing::debug!(
                displacement = feedback.displacement,
                like = feedback.preview.like,
                dislike = feedback.preview.dislike,
                "drag"
            );
        }
    }
    match controller.handle_pointer(PointerSignal::Release)? {
        PointerOutcome::Resolved(resolution) => {
            println!(
                "  swipe {:+.0}px -> {}",
                resolution.displacement,
                resolution.decision.label()
            );
            Ok(Some(resolution.event))
        }
        _ => Ok(None),
    }
}

fn print_summary(summary: &Summary) {
    println!(
        "liked {} / disliked {} / seen {}",
        summary.liked_count, summary.disliked_count, summary.total_seen
    );
    match &summary.gallery {
        swipe_core::Gallery::Empty { message } => println!("{message}"),
        swipe_core::Gallery::Entries { entries } => {
            for entry in entries {
                println!("  {} {}", entry.label(), entry.item.image_ref);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(total) = args.total {
        settings.total_items = total;
    }
    if let Some(api_url) = args.api_url {
        settings.cat_api_url = api_url;
    }

    let fallback = FallbackItems::from_settings(&settings)?;
    let primary: Box<dyn ItemSource> = if args.offline {
        Box::new(FallbackItems::from_settings(&settings)?)
    } else {
        Box::new(CataasItemSource::from_settings(&settings)?)
    };

    let mut gestures: VecDeque<Vec<f32>> = match args.gestures.as_deref() {
        Some(raw) => parse_gestures(raw)?.into(),
        None => VecDeque::new(),
    };
    let mut decisions: VecDeque<Decision> = args.decisions.into();

    let mut controller = SessionController::new(settings.total_items);
    let mut event = controller
        .start(primary.as_ref(), &fallback)
        .await
        .context("could not assemble a session")?;
    print_event(&event);

    let summary = loop {
        if let SessionEvent::Finished(summary) = event {
            break summary;
        }

        let next = if let Some(trace) = gestures.pop_front() {
            play_gesture(&mut controller, &trace)?
        } else {
            let decision = decisions.pop_front().unwrap_or_else(|| {
                if controller.session().cursor() % 2 == 0 {
                    Decision::Like
                } else {
                    Decision::Dislike
                }
            });
            println!("  button -> {}", decision.label());
            Some(controller.decide(decision)?)
        };

        if let Some(next) = next {
            print_event(&next);
            event = next;
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    if args.share {
        let result = Sharer::desktop().share(&summary.share_text());
        println!(
            "share: delivered={} mechanism={}",
            result.delivered,
            serde_json::to_string(&result.mechanism)?
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_gesture_traces() {
        let traces = parse_gestures("0,40,90,110; 10,-150").expect("parse");
        assert_eq!(traces, vec![vec![0.0, 40.0, 90.0, 110.0], vec![10.0, -150.0]]);
    }

    #[test]
    fn rejects_bad_coordinates() {
        assert!(parse_gestures("0,abc").is_err());
    }

    #[test]
    fn parses_decision_list() {
        let args = Args::parse_from(["swipe_cli", "--decisions", "like,dislike,cancel"]);
        assert_eq!(
            args.decisions,
            vec![Decision::Like, Decision::Dislike, Decision::Cancel]
        );
        assert!(!args.offline);
    }

    #[test]
    fn gesture_trace_drives_the_controller() {
        let mut controller = SessionController::new(1);
        controller.begin_loading();
        let fallback =
            FallbackItems::from_settings(&swipe_core::Settings::default()).expect("fallback");
        controller.load(fallback.generate(1)).expect("load");

        let event = play_gesture(&mut controller, &[0.0, 40.0, 90.0, 110.0])
            .expect("gesture")
            .expect("resolved");
        assert!(matches!(event, SessionEvent::Finished(ref s) if s.liked_count == 1));
    }
}
