// Run with: RUST_LOG=info cargo run --example odds_for_day
use climate_odds::{CalendarDay, ClimateOdds, ClimateOddsError, LatLon, Variable};

#[tokio::main]
async fn main() -> Result<(), ClimateOddsError> {
    env_logger::init();

    let client = ClimateOdds::builder().build()?;
    let dhaka = LatLon(23.8103, 90.4125);
    let day = CalendarDay::new(7, 15)?;

    for variable in Variable::ALL {
        match client
            .probabilities()
            .variable(variable)
            .location(dhaka)
            .day(day)
            .call()
            .await
        {
            Ok(odds) => {
                let json = serde_json::to_string(&odds).unwrap_or_default();
                println!("{variable} on {day}: {json}");
            }
            Err(e) => println!("{variable} on {day}: {e}"),
        }
    }

    let summary = client.grid_summary().day(day).call().await?;
    println!(
        "Humidity grid on {day}: {} ({}%) from {:?}",
        summary.most_frequent_level, summary.probability_percent, summary.levels
    );

    Ok(())
}
