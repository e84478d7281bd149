// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Veterinary records, rendered headlessly.
//!
//! Drives every `understory_windowing` presentation over a generated clinic
//! database: a patient list, a consultation table, a photo grid, and an
//! incrementally loaded history feed. Nothing is drawn; each step logs what a
//! host would materialize.
//!
//! Run:
//! - `cargo run -p understory_windowing_demos -- 5000`

use std::error::Error;
use std::fmt;

use kurbo::{Point, Size};
use log::{LevelFilter, info, warn};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use understory_windowing::{
    ColumnWidth, Footer, GridGeometry, GridWindow, IncrementalLoader, LinearGeometry,
    LinearWindow, LoaderConfig, ScrollAlign, TableColumns, TableGeometry, TableWindow,
};

const DEFAULT_PATIENTS: usize = 10_000;
const PAGE_SIZE: usize = 25;
const HISTORY_PAGES: usize = 4;
const ROW_HEIGHT: f64 = 48.0;

const SPECIES: [&str; 5] = ["dog", "cat", "rabbit", "parrot", "ferret"];
const VETS: [&str; 3] = ["Dr. Okafor", "Dr. Lindqvist", "Dr. Reyes"];
const REASONS: [&str; 4] = ["vaccination", "dental check", "limping", "annual exam"];

#[derive(Clone, Debug)]
struct Pet {
    name: String,
    species: &'static str,
    age: u32,
}

#[derive(Clone, Debug)]
struct Consultation {
    patient: usize,
    day: u32,
    vet: &'static str,
    reason: &'static str,
}

#[derive(Debug)]
struct FetchError {
    page: usize,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "history page {} timed out", self.page)
    }
}

impl Error for FetchError {}

fn patients(count: usize) -> Vec<Pet> {
    (0..count)
        .map(|i| Pet {
            name: format!("Patient #{i:05}"),
            species: SPECIES[i % SPECIES.len()],
            age: u32::try_from(i % 17).unwrap_or(0) + 1,
        })
        .collect()
}

fn consultation(index: usize, patients: usize) -> Consultation {
    Consultation {
        patient: (index * 7) % patients.max(1),
        day: u32::try_from(index % 365).unwrap_or(0) + 1,
        vet: VETS[index % VETS.len()],
        reason: REASONS[index % REASONS.len()],
    }
}

/// Stand-in for the clinic server. The second page fails on its first try.
async fn fetch_history(
    page: usize,
    attempt: usize,
    patients: usize,
) -> Result<Vec<Consultation>, FetchError> {
    if page == 1 && attempt == 0 {
        return Err(FetchError { page });
    }
    let start = page * PAGE_SIZE;
    Ok((start..start + PAGE_SIZE)
        .map(|i| consultation(i, patients))
        .collect())
}

fn patient_list(pets: &[Pet]) {
    info!("patient list: {} patients", pets.len());
    let mut list = LinearWindow::new(LinearGeometry::new(ROW_HEIGHT, 600.0));
    list.set_scroll_listener(|event| {
        info!(
            "  scrolled to {:.0}: rows {}..{}",
            event.offset, event.range.start, event.range.end
        );
    });

    for offset in [0.0, 2_000.0, 123_456.0, f64::MAX] {
        list.on_scroll(offset, pets.len());
    }

    let rendered = list.render(pets, |pet, index| {
        format!("{index:>6} {} ({}, {}y)", pet.name, pet.species, pet.age)
    });
    info!(
        "  spacer {:.0}px, translate {:.0}px, {} rows realized",
        rendered.total_extent,
        rendered.offset,
        rendered.items.len()
    );
    if let Some(last) = rendered.items.last() {
        info!("  last row: {last}");
    }

    let middle = pets.len() / 2;
    let range = list.scroll_to_index(middle, ScrollAlign::Center, pets.len());
    info!("  centered patient {middle}: rows {}..{}", range.start, range.end);
}

fn consultation_table(pets: &[Pet], visits: &[Consultation]) {
    info!("consultation table: {} visits", visits.len());
    let columns = TableColumns::new([
        ColumnWidth::Fixed(80.0),
        ColumnWidth::Fill(2.0),
        ColumnWidth::Fill(1.0),
        ColumnWidth::Fixed(140.0),
    ]);
    let mut table = TableWindow::new(
        columns,
        TableGeometry::new(32.0, 40.0, Size::new(900.0, 480.0)),
    );

    let header: Vec<_> = table.header_cells().collect();
    info!("  header cells: {header:?}");

    table.on_scroll(3_200.0, visits.len());
    let rendered = table.render_rows(visits, |visit, index, layout| {
        let patient = pets.get(visit.patient).map_or("unknown", |pet| pet.name.as_str());
        format!(
            "{index:>5} day {:>3} | {patient} | {} | {} ({} cols, {:.0}px)",
            visit.day,
            visit.vet,
            visit.reason,
            layout.spans().len(),
            layout.total_width()
        )
    });
    info!("  rows {:?} realized", rendered.indices());
    if let Some(first) = rendered.items.first() {
        info!("  first row: {first}");
    }

    // Narrower window: fill columns shrink, fixed ones keep their width.
    table.set_container_size(Size::new(600.0, 480.0));
    info!("  column spans after resize: {:?}", table.column_layout().spans());

    for y in [12.0, 40.0, 250.0] {
        let clicked = table.click_row(visits, y, |visit, index| {
            info!("  clicked row {index}: {} with {}", visit.reason, visit.vet);
        });
        if clicked.is_none() {
            info!("  click at y={y} missed every row");
        }
    }
}

fn photo_grid(pets: &[Pet]) {
    info!("photo grid: {} photos", pets.len());
    let geometry = GridGeometry::new(Size::new(160.0, 160.0), Size::new(700.0, 500.0))
        .with_gap(8.0)
        .with_overscan_rows(1);
    if let Err(err) = geometry.validate() {
        warn!("  grid geometry rejected: {err}");
        return;
    }
    let mut grid = GridWindow::new(geometry);
    let layout = grid.layout(pets.len());
    info!(
        "  {} per row, {} rows, {:.0}px tall",
        layout.items_per_row, layout.total_rows, layout.total_height
    );

    let visible = grid.on_scroll(5_000.0, pets.len());
    info!("  rows {:?} realized at offset {:.0}", visible.rows, visible.offset_y);
    let rendered = grid.render(pets, |pet, index, origin| {
        format!("{index}:{}@({:.0},{:.0})", pet.species, origin.x, origin.y)
    });
    info!("  {} thumbnails, first {:?}", rendered.items.len(), rendered.items.first());

    let under_cursor = grid.cell_at(Point::new(250.0, 120.0), pets.len());
    info!("  cursor over photo {under_cursor:?}");

    // Phone-sized viewport: fewer columns, same first visible photo.
    grid.set_container_size(Size::new(360.0, 640.0), pets.len());
    let visible = grid.visible_cells(pets.len());
    info!(
        "  after resize: scroll {:.0}, first photo {:?}",
        grid.scroll_offset(),
        visible.cells.first().map(|cell| cell.index)
    );
}

fn history_feed(patients: usize) {
    info!("history feed: pages of {PAGE_SIZE}");
    let viewport = 400.0;
    let config = LoaderConfig::default().with_threshold(ROW_HEIGHT * 2.0);
    let mut feed = IncrementalLoader::new(config);
    let mut history: Vec<Consultation> = Vec::new();
    let mut attempts = [0_usize; HISTORY_PAGES];

    // The user keeps dragging the scrollbar to the bottom.
    while feed.footer() != Footer::EndOfContent {
        let content = history.len() as f64 * ROW_HEIGHT;
        let bottom = (content - viewport).max(0.0);
        let page = history.len() / PAGE_SIZE;
        let attempt = attempts[page.min(HISTORY_PAGES - 1)];
        let Some(load) = feed.trigger(bottom, viewport, content, || {
            fetch_history(page, attempt, patients)
        }) else {
            break;
        };
        info!("  footer while loading: {:?}", feed.footer());
        attempts[page.min(HISTORY_PAGES - 1)] += 1;

        match pollster::block_on(load) {
            Ok(mut more) => {
                history.append(&mut more);
                feed.set_has_more(history.len() < PAGE_SIZE * HISTORY_PAGES);
                info!("  loaded page {page}, {} visits", history.len());
            }
            Err(err) => warn!("  {err}; scroll again to retry"),
        }
    }

    let rows = feed.render(&history, |visit, index| {
        format!("{index}: day {} {}", visit.day, visit.reason)
    });
    info!("  {} rows rendered, footer {:?}", rows.len(), feed.footer());
}

fn main() -> Result<(), Box<dyn Error>> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let count = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<usize>()?,
        None => DEFAULT_PATIENTS,
    };

    let pets = patients(count);
    let visits: Vec<_> = (0..count * 3).map(|i| consultation(i, count)).collect();

    patient_list(&pets);
    consultation_table(&pets, &visits);
    photo_grid(&pets);
    history_feed(count);
    Ok(())
}
