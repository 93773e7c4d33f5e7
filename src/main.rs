use std::error::Error;
use std::fs::File;
use std::rc::Rc;

use log::{info, LevelFilter};

use judgeplan::bamboo::{LivingTrack, Track};
use judgeplan::cache;
use judgeplan::chart::{BpmPoint, Chart, JudgeLine, Note, PositionSource};
use judgeplan::config::PlannerConfig;
use judgeplan::easing::EasingFn;
use judgeplan::geometry::Vec2;
use judgeplan::planner::{conservative, radical};
use judgeplan::timeline::{build_timeline, to_json};

const DEFAULT_CONFIG_PATH: &str = "judgeplan.ini";
const DEFAULT_CACHE_PATH: &str = "plan.psap";
const DEFAULT_JSON_PATH: &str = "plan.json";

/// A small synthetic chart: one line fixed at screen center with a handful
/// of notes, used to exercise the full plan → timeline → cache pipeline
/// when no real chart file is supplied.
fn demo_chart() -> Chart {
    let width = 1080;
    let height = 1920;

    let mut position = LivingTrack::new();
    position.cut(0.0, Vec2::new(width as f64 / 2.0, height as f64 / 2.0), Some(EasingFn::Linear));
    let mut rotation = LivingTrack::new();
    rotation.cut(0.0, 0.0, Some(EasingFn::Linear));

    let notes = vec![
        Note::tap(1.0, 0.0, true),
        Note::hold(1.5, 0.5, -100.0, true),
        Note::drag(2.2, 50.0, true),
        Note::flick(2.8, 0.0, true),
    ];
    let bpm_schedule: Rc<[BpmPoint]> = Rc::from(vec![BpmPoint { t_seconds: 0.0, bps: 2.0 }]);

    let line = JudgeLine::new(
        0,
        PositionSource::Direct(Track::Living(position)),
        Track::Living(rotation),
        notes,
        bpm_schedule,
    );
    Chart::new(width, height, vec![line])
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env().filter_level(LevelFilter::Info).init();

    let config = PlannerConfig::load_ini(DEFAULT_CONFIG_PATH);
    let chart = demo_chart();

    info!("Planning with conservative algorithm...");
    let events = conservative::plan(&chart, &config)?;
    info!("Conservative plan produced {} micro-events.", events.len());

    info!("Planning with radical algorithm for comparison...");
    let radical_events = radical::plan(&chart, &config)?;
    info!("Radical plan produced {} micro-events.", radical_events.len());

    let timeline = build_timeline(&events);
    info!("Built timeline with {} frames.", timeline.len());

    let file = File::create(DEFAULT_CACHE_PATH)?;
    cache::dump(file, chart.width, chart.height, &timeline)?;
    info!("Wrote plan to '{DEFAULT_CACHE_PATH}'.");

    std::fs::write(DEFAULT_JSON_PATH, to_json(&timeline)?)?;
    info!("Wrote plan to '{DEFAULT_JSON_PATH}' for external tooling.");

    Ok(())
}
