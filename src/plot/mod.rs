// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to plot the products of a reduction.

mod error;
#[cfg(test)]
mod tests;

pub use error::PlotError;

use std::ops::Range;
use std::path::Path;

use log::debug;
use ndarray::prelude::*;
use plotters::{coord::Shift, prelude::*};

use crate::{
    params::Reduction,
    reduce::{velocity_km_s, GaussianFit, Histogram},
};

/// The number of X pixels on the plot.
const X_PIXELS: u32 = 2400;
/// The number of Y pixels on the plot.
const Y_PIXELS: u32 = 1500;
/// Waterfalls are decimated to at most this many cells along each axis.
const MAX_WATERFALL_CELLS: usize = 400;

const PRIMARY: RGBColor = RGBColor(31, 119, 180);
const SECONDARY: RGBColor = RGBColor(255, 127, 14);
const NO_DATA: RGBColor = RGBColor(220, 220, 220);

fn draw_err<E: std::fmt::Display>(panel: &'static str) -> impl Fn(E) -> PlotError {
    move |e| PlotError::Draw {
        panel,
        msg: e.to_string(),
    }
}

/// Plot the average spectrum, the calibrated spectrum, the waterfall, the
/// power time series and the distributions of power to a PNG file.
pub fn plot_reduction(reduction: &Reduction, file: &Path) -> Result<(), PlotError> {
    let is_png = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false);
    if !is_png {
        return Err(PlotError::NotPng(file.to_path_buf()));
    }
    debug!("Plotting to '{}'", file.display());

    let root = BitMapBackend::new(file, (X_PIXELS, Y_PIXELS)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err("background"))?;
    let panels = root.split_evenly((2, 3));

    let power_desc = if reduction.scale.is_decibel() {
        "Power (dB)"
    } else {
        "Power (arb. units)"
    };

    let spectrum_caption = match reduction.velocity_edges {
        Some((left, right)) => {
            format!("Average spectrum ({left:.0} to {right:.0} km/s)")
        }
        None => "Average spectrum".to_string(),
    };
    let mut spectra = vec![(reduction.avg_spectrum.view(), PRIMARY, "On")];
    if let Some(calibration) = &reduction.calibration {
        spectra.push((calibration.ref_spectrum.view(), SECONDARY, "Off"));
    }
    plot_lines(
        &panels[0],
        "average spectrum",
        &spectrum_caption,
        ("Frequency (MHz)", power_desc),
        reduction.frequency_mhz.view(),
        &spectra,
        reduction.velocity_edges.and(reduction.rest_frequency),
    )?;

    match &reduction.calibration {
        Some(calibration) => {
            let label = format!("Median ({})", reduction.median_frequency);
            let mut series = vec![(calibration.snr.view(), PRIMARY, "Calibrated")];
            if let Some(snr_clean) = &calibration.snr_clean {
                series.push((snr_clean.view(), SECONDARY, label.as_str()));
            }
            plot_lines(
                &panels[1],
                "calibrated spectrum",
                "Calibrated spectrum",
                ("Frequency (MHz)", "Signal-to-noise ratio"),
                reduction.frequency_mhz.view(),
                &series,
                reduction.velocity_edges.and(reduction.rest_frequency),
            )?;
        }
        None => plot_nothing(
            &panels[1],
            "calibrated spectrum",
            "Calibrated spectrum",
            "No reference capture was given",
        )?,
    }

    plot_waterfall(&panels[2], reduction)?;

    let label = format!("Median ({})", reduction.median_time);
    let mut series = vec![(reduction.power.view(), PRIMARY, "Power")];
    if let Some(power_clean) = &reduction.power_clean {
        series.push((power_clean.view(), SECONDARY, label.as_str()));
    }
    plot_lines(
        &panels[3],
        "time series",
        "Power time series",
        ("Relative time (s)", power_desc),
        reduction.time.view(),
        &series,
        None,
    )?;

    plot_distribution(
        &panels[4],
        "Power distribution",
        power_desc,
        &reduction.power_histogram,
        &reduction.power_fit,
    )?;
    match (
        &reduction.power_clean_histogram,
        &reduction.power_clean_fit,
    ) {
        (Some(histogram), Some(fit)) => plot_distribution(
            &panels[5],
            "Filtered power distribution",
            power_desc,
            histogram,
            fit,
        )?,
        _ => plot_nothing(
            &panels[5],
            "filtered power distribution",
            "Filtered power distribution",
            "No time-domain median filter was applied",
        )?,
    }

    root.present().map_err(draw_err("plot"))?;
    Ok(())
}

/// The range spanned by the finite values, padded a little. If there are no
/// finite values, (0, 1) is used.
fn finite_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });
    if min > max {
        return 0.0..1.0;
    }
    let pad = if max > min {
        (max - min) * 0.05
    } else if min != 0.0 {
        min.abs() * 0.05
    } else {
        0.5
    };
    (min - pad)..(max + pad)
}

/// Plot one or more series against a shared x axis. Non-finite points are
/// skipped. With a rest frequency \[Hz\], the top axis shows the Doppler
/// velocity and a vertical line marks zero velocity.
fn plot_lines<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &'static str,
    caption: &str,
    (x_desc, y_desc): (&str, &str),
    x: ArrayView1<f64>,
    series: &[(ArrayView1<f64>, RGBColor, &str)],
    rest_frequency: Option<f64>,
) -> Result<(), PlotError> {
    let x_range = finite_range(x.iter());
    let y_range = finite_range(series.iter().flat_map(|(y, _, _)| y.iter()));
    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(50)
        .top_x_label_area_size(if rest_frequency.is_some() { 50 } else { 0 })
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .map_err(draw_err(panel))?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(draw_err(panel))?;

    for &(y, colour, label) in series {
        chart
            .draw_series(LineSeries::new(
                x.iter()
                    .zip(y.iter())
                    .filter(|(x, y)| x.is_finite() && y.is_finite())
                    .map(|(&x, &y)| (x, y)),
                colour,
            ))
            .map_err(draw_err(panel))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));
    }

    if let Some(f_rest) = rest_frequency {
        let f_rest_mhz = f_rest * 1e-6;
        if x_range.contains(&f_rest_mhz) {
            chart
                .draw_series(LineSeries::new(
                    [(f_rest_mhz, y_range.start), (f_rest_mhz, y_range.end)],
                    BLACK.mix(0.5),
                ))
                .map_err(draw_err(panel))?;
        }
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err(panel))?;
    }

    if let Some(f_rest) = rest_frequency {
        let velocity = move |f: &f64| format!("{:.0}", velocity_km_s(*f, f_rest));
        let mut chart = chart.set_secondary_coord(x_range, y_range);
        chart
            .configure_secondary_axes()
            .x_desc("Velocity (km/s)")
            .x_label_formatter(&velocity)
            .draw()
            .map_err(draw_err(panel))?;
    }
    Ok(())
}

/// A titled, greyed-out panel with a message.
fn plot_nothing<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &'static str,
    caption: &str,
    msg: &str,
) -> Result<(), PlotError> {
    let area = area
        .titled(caption, ("sans-serif", 30))
        .map_err(draw_err(panel))?;
    area.fill(&NO_DATA).map_err(draw_err(panel))?;
    area.draw_text(msg, &("sans-serif", 26).into_font().color(&BLACK), (20, 20))
        .map_err(draw_err(panel))?;
    Ok(())
}

fn plot_waterfall<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    reduction: &Reduction,
) -> Result<(), PlotError> {
    const PANEL: &str = "waterfall";

    let (subs, channels) = reduction.waterfall.dim();
    let sub_step = subs.div_ceil(MAX_WATERFALL_CELLS).max(1);
    let chan_step = channels.div_ceil(MAX_WATERFALL_CELLS).max(1);
    let cells = reduction
        .scale
        .apply_waterfall(reduction.waterfall.slice(s![..;sub_step, ..;chan_step]));
    let colour_range = finite_range(cells.iter());

    let df = reduction.params.bandwidth / channels as f64 * 1e-6;
    let dt = reduction.params.t_sample;
    let f0 = reduction.frequency_mhz.first().copied().unwrap_or(0.0);
    let x_range = f0..f0 + df * channels as f64;
    let y_range = 0.0..dt * subs as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Waterfall", ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_err(PANEL))?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Frequency (MHz)")
        .y_desc("Relative time (s)")
        .draw()
        .map_err(draw_err(PANEL))?;

    let cell_width = df * chan_step as f64;
    let cell_height = dt * sub_step as f64;
    chart
        .draw_series(cells.indexed_iter().map(|((i_sub, i_chan), &v)| {
            let x = f0 + (i_chan * chan_step) as f64 * df;
            let y = (i_sub * sub_step) as f64 * dt;
            let style = if v.is_finite() {
                let t = ((v - colour_range.start) / (colour_range.end - colour_range.start))
                    .clamp(0.0, 1.0);
                HSLColor(0.7 * (1.0 - t), 1.0, 0.5).filled()
            } else {
                NO_DATA.filled()
            };
            Rectangle::new([(x, y), (x + cell_width, y + cell_height)], style)
        }))
        .map_err(draw_err(PANEL))?;
    Ok(())
}

/// Plot a histogram density with its fitted Gaussian.
fn plot_distribution<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    x_desc: &str,
    histogram: &Histogram,
    fit: &GaussianFit,
) -> Result<(), PlotError> {
    const PANEL: &str = "power distribution";

    let x_range = finite_range(histogram.edges.iter().chain(fit.x.iter()));
    let y_max = histogram
        .density
        .iter()
        .chain(fit.density.iter())
        .filter(|v| v.is_finite())
        .fold(0.0_f64, |acc, &v| acc.max(v));
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, 0.0..y_max)
        .map_err(draw_err(PANEL))?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Probability density")
        .draw()
        .map_err(draw_err(PANEL))?;

    chart
        .draw_series(
            histogram
                .edges
                .windows(2)
                .into_iter()
                .zip(histogram.density.iter())
                .filter(|(_, d)| d.is_finite())
                .map(|(edges, &d)| {
                    Rectangle::new([(edges[0], 0.0), (edges[1], d)], PRIMARY.mix(0.6).filled())
                }),
        )
        .map_err(draw_err(PANEL))?;
    chart
        .draw_series(LineSeries::new(
            fit.x
                .iter()
                .zip(fit.density.iter())
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(&x, &y)| (x, y)),
            SECONDARY.stroke_width(3),
        ))
        .map_err(draw_err(PANEL))?;
    Ok(())
}
