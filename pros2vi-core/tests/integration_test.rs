use pros2vi_core::*;

#[test]
fn test_dssp_to_rows() {
    let dssp = concat!(
        "==== Secondary Structure Definition by the program DSSP ====\n",
        "  #  RESIDUE AA STRUCTURE BP1 BP2  ACC\n",
        "    1    1 A M  H\n",
        "    2    2 A K  H\n",
        "    3    3 A L  H\n",
        "    4    4 A V  E\n",
        "    5    5 A I  E\n",
        "    6    6 A G\n",
    );
    assert!(dssp.lines().nth(1).is_some_and(|l| l.starts_with("  #  RESIDUE")));
    let records = io::DsspReader::read(std::io::Cursor::new(dssp)).unwrap();
    let structure = Structure::from_assignments(records).unwrap();
    assert_eq!(structure.chain_lengths(), vec![6]);

    let seg = Segmenter::new(3).unwrap().segment(&structure.chains[0]);
    let rows = paginate(&seg);
    assert_eq!(rows.len(), 2);

    let texts: Vec<Option<String>> = rows
        .iter()
        .flat_map(|r| r.annotations.iter().map(AnnotationCell::text))
        .collect();
    assert_eq!(texts, vec![Some("H1".to_string()), Some("E1".to_string()), None]);

    let glyphs: Vec<GlyphCell> = rows.iter().flat_map(|r| r.glyphs.clone()).collect();
    assert_eq!(glyphs[4], GlyphCell::Glyph(GlyphKey::StrandEnd));
    assert_eq!(glyphs[5], GlyphCell::Glyph(GlyphKey::Coil));
}

#[test]
fn test_two_chains_geometry() {
    let table = "A 1 M H\nA 2 K H\nB 1 G E\n";
    let records = io::TableReader::read(std::io::Cursor::new(table)).unwrap();
    let structure = Structure::from_assignments(records).unwrap();

    let geometry = CanvasGeometry::compute(50, &structure.chain_lengths()).unwrap();
    // (2*76 + 2*96 + 956) / 2
    assert_eq!(geometry, CanvasGeometry { width: 599, height: 650 });
}

#[test]
fn test_unknown_label_in_table() {
    let records = io::TableReader::read(std::io::Cursor::new("A 1 M X\n")).unwrap();
    let err = Structure::from_assignments(records).unwrap_err();
    assert!(matches!(err, CoreError::UnknownLabel { label: 'X', .. }));
}

#[test]
fn test_padding_cases() {
    let seg = |n: usize, rpl: usize| {
        let chain = Chain::from_codes("A", &"A".repeat(n), &"-".repeat(n)).unwrap();
        paginate(&Segmenter::new(rpl).unwrap().segment(&chain))
    };

    let exact = seg(20, 10);
    assert_eq!(exact.len(), 2);
    assert_eq!(exact[1].padding(), 0);

    let short = seg(19, 10);
    assert_eq!(short.len(), 2);
    assert_eq!(short[1].padding(), 1);
    assert_eq!(short[1].first_position, 11);
    assert_eq!(short[1].last_position, 19);
}
