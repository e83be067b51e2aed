//! Inspect command - print a leg and step summary of a route file.

use std::path::PathBuf;

use navtrack::route::Route;

use super::common::{format_distance, format_duration, load_route};
use crate::error::CliError;

/// Arguments for the inspect command.
pub struct InspectArgs {
    pub route: PathBuf,
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> Result<(), CliError> {
    let route = load_route(&args.route)?;
    print!("{}", summarize(&route));
    Ok(())
}

/// Render the summary as text, one line per step.
fn summarize(route: &Route) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Route: {}, {}, {} legs, {} steps\n",
        format_distance(route.distance),
        format_duration(route.duration),
        route.legs.len(),
        route.step_count()
    ));

    for (leg_index, leg) in route.legs.iter().enumerate() {
        out.push_str(&format!(
            "\nLeg {}: {} ({}, {})\n",
            leg_index,
            if leg.summary.is_empty() { "-" } else { &leg.summary },
            format_distance(leg.distance),
            format_duration(leg.duration)
        ));

        for (step_index, step) in leg.steps.iter().enumerate() {
            let maneuver = match &step.maneuver.modifier {
                Some(modifier) => format!("{} {}", step.maneuver.maneuver_type, modifier),
                None => step.maneuver.maneuver_type.clone(),
            };
            out.push_str(&format!(
                "  {:>3}  {:<20} {:<24} {:>9}  {:>7}  voice:{} banner:{}\n",
                step_index,
                maneuver,
                step.name,
                format_distance(step.distance),
                format_duration(step.duration),
                step.voice_instructions.len(),
                step.banner_instructions.len()
            ));
        }
    }

    out
}
