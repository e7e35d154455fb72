use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use std::time::Duration;

use cogex_render::font::any_system_font;
use cogex_render::{TextBox, TextBoxParams, TextStim, TextStimParams, TextStimulus};
use tiny_skia::Pixmap;

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;
const TEXT: &str = "ABCDE FGH IJKLMNO P QRS TUVWXYZAB CDE ùéèàç^ù ABCD EFGHIJKLM NO PQRSTUV \
                    WXY Z ABCDEFG HIJKL MN OPQRSTU VWX YZ ±√∞≤≥ ABC DEFGH IJK LMNOPQR";

/// Draw-only and set-text-then-draw for both stimulus kinds on a full HD frame.
pub fn bench_text_draw(c: &mut Criterion) {
    let font = any_system_font().expect("benches need an installed font").font;
    let mut group = c.benchmark_group("text_draw");

    group
        .sample_size(50)
        .measurement_time(Duration::from_secs(10))
        .warm_up_time(Duration::from_secs(2));

    let mut frame = Pixmap::new(WIDTH, HEIGHT).unwrap();

    let mut stim =
        TextStim::new(font.clone(), (WIDTH, HEIGHT), TextStimParams::default(), TEXT).unwrap();
    let mut tbox =
        TextBox::new(font.clone(), (WIDTH, HEIGHT), TextBoxParams::default(), TEXT).unwrap();

    group.bench_function("text_stim_draw", |b| {
        b.iter(|| stim.draw(black_box(&mut frame)).unwrap());
    });

    group.bench_function("text_box_draw", |b| {
        b.iter(|| tbox.draw(black_box(&mut frame)).unwrap());
    });

    group.bench_function("text_stim_change", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let text = if flip { &TEXT[1..] } else { TEXT };
            stim.set_text(black_box(text)).unwrap();
            stim.draw(&mut frame).unwrap();
        });
    });

    group.bench_function("text_box_change", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let text = if flip { &TEXT[1..] } else { TEXT };
            tbox.set_text(black_box(text)).unwrap();
            tbox.draw(&mut frame).unwrap();
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
        .confidence_level(0.95)
        .noise_threshold(0.02)
        .significance_level(0.05);
    targets = bench_text_draw
}

criterion_main!(benches);
