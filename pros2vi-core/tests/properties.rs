use proptest::prelude::*;
use pros2vi_core::*;

fn label_strategy() -> impl Strategy<Value = char> {
    prop::sample::select(vec!['H', 'B', 'E', 'G', 'I', 'P', 'T', 'S', '-'])
}

/// Runs of labels, so long stretches of one code are common.
fn codes_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((label_strategy(), 1usize..12), 0..40).prop_map(|runs| {
        runs.into_iter()
            .flat_map(|(code, len)| std::iter::repeat(code).take(len))
            .collect()
    })
}

fn build_chain(codes: &str) -> Chain {
    let sequence: String = std::iter::repeat('A').take(codes.chars().count()).collect();
    Chain::from_codes("A", &sequence, codes).unwrap()
}

proptest! {
    #[test]
    fn spans_partition_the_chain(codes in codes_strategy(), rpl in 1usize..60) {
        let chain = build_chain(&codes);
        let seg = Segmenter::new(rpl).unwrap().segment(&chain);

        let mut next = 0;
        for span in &seg.spans {
            prop_assert_eq!(span.start, next);
            prop_assert!(span.end >= span.start);
            next = span.end + 1;
        }
        prop_assert_eq!(next, chain.len());
        prop_assert_eq!(seg.spans.iter().map(AnnotationSpan::width).sum::<usize>(), chain.len());
    }

    #[test]
    fn runs_cover_the_chain(codes in codes_strategy(), rpl in 1usize..60) {
        let chain = build_chain(&codes);
        let seg = Segmenter::new(rpl).unwrap().segment(&chain);
        prop_assert_eq!(seg.runs.iter().map(StructureRun::len).sum::<usize>(), chain.len());
        for pair in seg.runs.windows(2) {
            prop_assert_eq!(pair[0].end_index + 1, pair[1].start_index);
            prop_assert_ne!(pair[0].label, pair[1].label);
        }
    }

    #[test]
    fn rows_are_full_width(codes in codes_strategy(), rpl in 1usize..60) {
        let chain = build_chain(&codes);
        let rows = paginate(&Segmenter::new(rpl).unwrap().segment(&chain));

        prop_assert_eq!(rows.len(), page_row_count(chain.len(), rpl));
        for row in &rows {
            prop_assert_eq!(row.glyphs.len(), rpl);
            prop_assert_eq!(row.residues.len(), rpl);
            prop_assert_eq!(row.annotation_width(), rpl);
        }
        if let Some(last) = rows.last() {
            prop_assert_eq!(last.last_position, chain.len());
            prop_assert!(last.padding() < rpl);
        }
    }

    #[test]
    fn ordinals_do_not_depend_on_line_width(codes in codes_strategy(), a in 1usize..60, b in 1usize..60) {
        let chain = build_chain(&codes);
        let tags_a: Vec<RunTag> = Segmenter::new(a).unwrap().segment(&chain).tags().collect();
        let tags_b: Vec<RunTag> = Segmenter::new(b).unwrap().segment(&chain).tags().collect();
        prop_assert_eq!(&tags_a, &tags_b);

        for label in [StructureLabel::Helix, StructureLabel::Strand, StructureLabel::Bridge] {
            let ordinals: Vec<u32> = tags_a.iter().filter(|t| t.label == label).map(|t| t.ordinal).collect();
            let expected: Vec<u32> = (1..=ordinals.len() as u32).collect();
            prop_assert_eq!(ordinals, expected);
        }
    }

    #[test]
    fn geometry_is_pure(rpl in 1usize..200, lengths in prop::collection::vec(0usize..2000, 0..8)) {
        let first = CanvasGeometry::compute(rpl, &lengths).unwrap();
        let second = CanvasGeometry::compute(rpl, &lengths).unwrap();
        prop_assert_eq!(first, second);
    }
}
