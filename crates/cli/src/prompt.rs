use crate::render;
use mandi_core::client::RecommendationApi;
use mandi_core::wizard::{states, Step, Wizard};
use std::io::{BufRead, Write};

enum Input {
    Line(String),
    Back,
    Quit,
}

pub async fn run<R: BufRead, W: Write>(
    api: &dyn RecommendationApi,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut wizard = Wizard::new();

    writeln!(out, "Farmer Market Intelligence")?;
    writeln!(out, "Get the best price for your crops. Enter q to quit, b to go back.")?;

    loop {
        match wizard.step() {
            Step::SelectingState => {
                writeln!(out)?;
                writeln!(out, "Select your state:")?;
                for (idx, s) in states().iter().enumerate() {
                    writeln!(out, "  {}. {}", idx + 1, s.name)?;
                }
                let Some(choice) = ask(input, out, "state> ")? else {
                    return Ok(());
                };
                match choice {
                    Input::Quit => return Ok(()),
                    Input::Back => writeln!(out, "Already at the first step.")?,
                    Input::Line(line) => {
                        let id = pick(&line, states().iter().map(|s| s.id));
                        if let Err(err) = wizard.select_state(&id) {
                            writeln!(out, "{err}")?;
                        }
                    }
                }
            }
            Step::SelectingCrop => {
                let Some(state) = wizard.selected_state() else {
                    anyhow::bail!("crop screen reached without a state");
                };
                writeln!(out)?;
                writeln!(out, "Select your crop ({}):", state.name)?;
                for (idx, c) in state.crops.iter().enumerate() {
                    writeln!(out, "  {}. {}", idx + 1, c.name)?;
                }
                let Some(choice) = ask(input, out, "crop> ")? else {
                    return Ok(());
                };
                match choice {
                    Input::Quit => return Ok(()),
                    Input::Back => wizard.back()?,
                    Input::Line(line) => {
                        let id = pick(&line, state.crops.iter().map(|c| c.id));
                        if let Err(err) = wizard.select_crop(&id) {
                            writeln!(out, "{err}")?;
                        }
                    }
                }
            }
            Step::EnteringQuery => {
                if let Some(notice) = wizard.notice() {
                    writeln!(out, "{notice}")?;
                }
                writeln!(out)?;
                let Some(location) = ask(input, out, "Your location (district): ")? else {
                    return Ok(());
                };
                let location = match location {
                    Input::Quit => return Ok(()),
                    Input::Back => {
                        wizard.back()?;
                        continue;
                    }
                    Input::Line(line) => line,
                };
                let Some(quantity) = ask(input, out, "Quantity (quintals): ")? else {
                    return Ok(());
                };
                let quantity = match quantity {
                    Input::Quit => return Ok(()),
                    Input::Back => {
                        wizard.back()?;
                        continue;
                    }
                    Input::Line(line) => match line.parse::<f64>() {
                        Ok(q) => q,
                        Err(_) => {
                            writeln!(out, "quantity must be a number")?;
                            continue;
                        }
                    },
                };

                writeln!(out, "Getting Recommendation...")?;
                out.flush()?;
                if let Err(err) = wizard.submit(api, &location, quantity).await {
                    writeln!(out, "{err}")?;
                }
            }
            Step::ShowingResults => {
                if let Some(rec) = wizard.recommendation() {
                    render::recommendation(out, rec)?;
                }
                writeln!(out)?;
                let Some(choice) = ask(input, out, "n = new search, q = quit> ")? else {
                    return Ok(());
                };
                match choice {
                    Input::Quit => return Ok(()),
                    Input::Line(line) if line.eq_ignore_ascii_case("n") => wizard.new_search()?,
                    _ => writeln!(out, "Enter n or q.")?,
                }
            }
        }
    }
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> anyhow::Result<Option<Input>> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let line = line.trim();
    Ok(Some(match line {
        "q" | "Q" => Input::Quit,
        "b" | "B" => Input::Back,
        _ => Input::Line(line.to_string()),
    }))
}

// A 1-based menu number selects from `ids`; anything else is taken as an id.
fn pick<'a>(line: &str, ids: impl Iterator<Item = &'a str>) -> String {
    match line.parse::<usize>() {
        Ok(n) if n >= 1 => ids
            .into_iter()
            .nth(n - 1)
            .map(str::to_string)
            .unwrap_or_else(|| line.to_string()),
        _ => line.to_lowercase(),
    }
}
