use std::path::PathBuf;

use genoview::color::HIGHLIGHT;
use genoview::primitive::Line;
use genoview::{
    AlignReference, AnchorRecovery, Canvas, Dataset, Direction, Gene, GenomeView, GenoviewError,
    LayoutConfig, Point, Primitive, Track,
};
use rstest::{fixture, rstest};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/three_genomes.json")
}

#[fixture]
fn dataset() -> Dataset {
    Dataset::from_path(fixture_path()).unwrap()
}

fn view_with(dataset: Dataset, recovery: AnchorRecovery) -> GenomeView {
    GenomeView::new(dataset, LayoutConfig::default(), recovery).unwrap()
}

// (track index, gene id, arrow left) for every arrow in the current layout
fn arrow_lefts(view: &GenomeView) -> Vec<(usize, u64, f64)> {
    view.layout()
        .arrows()
        .map(|(_, a)| (a.track, a.gene, a.left))
        .collect()
}

#[rstest]
fn genome_max_tracks_the_longest_genome(dataset: Dataset) {
    let mut view = view_with(dataset, AnchorRecovery::KeepPrevious);
    assert_eq!(view.layout().genome_max, 340);

    let mut tracks = view.dataset().tracks().to_vec();
    let mut genes = tracks[2].genes().to_vec();
    genes.push(Gene::new(9001, Direction::Forward, 500, 600));
    tracks[2] = Track::new("Genome_3", genes).unwrap();
    view.replace_tracks(tracks).unwrap();
    assert_eq!(view.layout().genome_max, 600);
}

#[rstest]
#[case(0.0)]
#[case(-200.0)]
#[case(75.0)]
fn anchor_genes_line_up_on_the_viewport_center(dataset: Dataset, #[case] pan_x: f64) {
    let mut view = view_with(dataset, AnchorRecovery::KeepPrevious);
    view.pan_by(pan_x, 0.0);
    view.set_alignment_anchor(Some("GC_X")).unwrap();
    let target = 500.0 - pan_x;

    let layout = view.layout();
    assert!(layout.diagnostics.is_empty());
    let cluster = view.dataset().cluster("GC_X").unwrap();
    for (i, summary) in layout.tracks.iter().enumerate() {
        assert!(summary.aligned);
        let track = &view.dataset().tracks()[i];
        let anchor = track.gene(cluster.gene_for(track.label()).unwrap()).unwrap();
        assert_eq!(anchor.midpoint() + summary.offset, target);

        for (t, id, left) in arrow_lefts(&view).into_iter().filter(|(t, _, _)| *t == i) {
            let gene = view.dataset().tracks()[t].gene(id).unwrap();
            assert_eq!(left, 1.5 + gene.start as f64 + summary.offset);
        }
    }
}

#[rstest]
fn fixed_center_ignores_pan(dataset: Dataset) {
    let config = LayoutConfig {
        reference: AlignReference::CanvasCenter,
        ..LayoutConfig::default()
    };
    let mut view = GenomeView::new(dataset, config, AnchorRecovery::Clear).unwrap();
    view.pan_by(-300.0, 0.0);
    view.set_alignment_anchor(Some("GC_X")).unwrap();
    let offsets: Vec<f64> = view.layout().tracks.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![500.0 - 175.0, 500.0 - 140.0, 500.0 - 190.0]);
}

#[rstest]
fn missing_anchor_genes_only_affect_their_track(dataset: Dataset) {
    let mut view = view_with(dataset, AnchorRecovery::KeepPrevious);
    view.set_alignment_anchor(Some("GC_Y")).unwrap();
    let layout = view.layout();

    let missing: Vec<(String, u64)> = layout
        .diagnostics
        .iter()
        .map(|d| match d {
            GenoviewError::AnchorGeneNotFound { track, gene_id, .. } => (track.clone(), *gene_id),
            other => panic!("unexpected diagnostic {}", other),
        })
        .collect();
    assert_eq!(
        missing,
        vec![("Genome_1".to_string(), 14937), ("Genome_3".to_string(), 18011)]
    );

    let aligned: Vec<bool> = layout.tracks.iter().map(|t| t.aligned).collect();
    assert_eq!(aligned, vec![false, true, false]);
    assert_eq!(layout.tracks[0].offset, 0.0);
    assert_eq!(layout.tracks[1].offset, 500.0 - 270.0);
    assert_eq!(layout.arrows().count(), 12);
}

#[rstest]
fn unknown_cluster_keeps_previous_geometry(dataset: Dataset) {
    let mut view = view_with(dataset, AnchorRecovery::KeepPrevious);
    view.set_alignment_anchor(Some("GC_X")).unwrap();
    let before = view.layout().primitives().to_vec();

    let err = view.set_alignment_anchor(Some("GC_NOPE")).unwrap_err();
    assert!(matches!(err, GenoviewError::UnknownCluster(ref name) if name == "GC_NOPE"));
    assert_eq!(view.anchor(), Some("GC_X"));
    assert_eq!(view.layout().primitives(), before.as_slice());
}

#[rstest]
fn unknown_cluster_after_panning_leaves_the_layout_alone(dataset: Dataset) {
    let mut view = view_with(dataset, AnchorRecovery::KeepPrevious);
    view.set_alignment_anchor(Some("GC_X")).unwrap();
    let before = view.layout().primitives().to_vec();

    view.pan_by(-200.0, 0.0);
    assert!(view.set_alignment_anchor(Some("GC_NOPE")).is_err());
    assert_eq!(view.anchor(), Some("GC_X"));
    let offsets: Vec<f64> = view.layout().tracks.iter().map(|t| t.offset).collect();
    assert_eq!(offsets, vec![500.0 - 175.0, 500.0 - 140.0, 500.0 - 190.0]);
    assert_eq!(view.layout().primitives(), before.as_slice());

    // the pan is picked up by the next real anchor change
    view.set_alignment_anchor(Some("GC_X")).unwrap();
    assert_eq!(view.layout().tracks[0].offset, 700.0 - 175.0);
}

#[rstest]
fn unknown_cluster_can_clear_the_anchor(dataset: Dataset) {
    let mut view = view_with(dataset, AnchorRecovery::Clear);
    let unaligned = view.layout().primitives().to_vec();
    view.set_alignment_anchor(Some("GC_X")).unwrap();
    assert_ne!(view.layout().primitives(), unaligned.as_slice());

    assert!(view.set_alignment_anchor(Some("GC_NOPE")).is_err());
    assert_eq!(view.anchor(), None);
    assert_eq!(view.layout().primitives(), unaligned.as_slice());
}

#[rstest]
fn ruler_ticks_stop_before_genome_max() {
    let track = Track::new(
        "Genome_1",
        vec![
            Gene::new(1, Direction::Forward, 10, 90),
            Gene::new(2, Direction::Reverse, 120, 350),
        ],
    )
    .unwrap();
    let data = Dataset::new(vec![track], Default::default()).unwrap();
    let view = view_with(data, AnchorRecovery::KeepPrevious);
    let ticks: Vec<&Line> = view
        .layout()
        .primitives()
        .iter()
        .filter_map(|p| match p {
            Primitive::Line(l) if l.from.x == l.to.x => Some(l),
            _ => None,
        })
        .collect();
    assert_eq!(
        ticks.iter().map(|l| l.from.x).collect::<Vec<_>>(),
        vec![0.0, 100.0, 200.0, 300.0]
    );
    let labels: Vec<&str> = view
        .layout()
        .primitives()
        .iter()
        .filter_map(|p| match p {
            Primitive::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(labels, vec!["0.0 kB", "0.1 kB", "0.2 kB", "0.3 kB", "100 nts"]);
}

#[rstest]
fn clicking_an_arrow_reports_its_cluster(dataset: Dataset) {
    let mut view = view_with(dataset, AnchorRecovery::KeepPrevious);
    let (_, arrow) = view
        .layout()
        .arrows()
        .find(|(_, a)| a.gene == 19391)
        .unwrap();
    let (min, max) = arrow.bounds();
    let center = Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);

    let hit = view.click(center).unwrap();
    assert_eq!(hit.gene, 19391);
    assert_eq!(hit.cluster.as_deref(), Some("GC_X"));
    assert!(hit.selected);

    let mut canvas = Canvas::new(1000, 200);
    canvas.draw(view.layout(), view.viewport(), view.selection());
    let px = canvas.pixel(center.x as usize, center.y as usize).unwrap();
    assert_eq!((px.r, px.g, px.b), (HIGHLIGHT.r, HIGHLIGHT.g, HIGHLIGHT.b));

    assert!(!view.click(center).unwrap().selected);
    assert!(view.selection().is_empty());
    assert!(view.click(Point::new(5.0, 190.0)).is_none());
}

#[rstest]
fn click_follows_zoom(dataset: Dataset) {
    let mut view = view_with(dataset, AnchorRecovery::KeepPrevious);
    view.zoom_wheel(-700.0, Point::new(0.0, 0.0));
    let zoom = view.viewport().zoom;
    assert!(zoom > 1.0);
    let (id, arrow) = view
        .layout()
        .arrows()
        .find(|(_, a)| a.gene == 2342)
        .unwrap();
    let (min, max) = arrow.bounds();
    let world = Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
    let screen = view.viewport().to_screen(world);
    assert_eq!(view.click(screen).map(|h| h.primitive), Some(id));
}
