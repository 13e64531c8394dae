//! Layer stack behaviour of frames, exercised through `UiContext`.

use strata_ui::{FrameId, LayerId, UiContext, Vec2};

fn assert_well_formed(ui: &UiContext, frame: FrameId) {
    let all = ui.all_layers(frame);
    assert!(all.len() >= 2);
    assert_eq!(all[0], ui.component_layer(frame).unwrap());
    assert_eq!(*all.last().unwrap(), ui.tooltip_layer(frame).unwrap());
    assert_eq!(&all[1..all.len() - 1], ui.layers(frame).as_slice());

    let frames = ui.frames();
    assert_eq!(frames.bottom_layer(all[0]), None);
    assert_eq!(frames.top_layer(*all.last().unwrap()), None);
    for pair in all.windows(2) {
        assert_eq!(frames.top_layer(pair[0]), Some(pair[1]));
        assert_eq!(frames.bottom_layer(pair[1]), Some(pair[0]));
    }
    for layer in &all {
        assert_eq!(ui.layer_frame(*layer), Some(frame));
    }
}

#[test]
fn test_add_remove_scenario() {
    let mut ui = UiContext::new();
    let f = ui.create_frame(Vec2::new(640.0, 480.0));
    let component = ui.component_layer(f).unwrap();
    let tooltip = ui.tooltip_layer(f).unwrap();
    assert_eq!(ui.all_layers(f), vec![component, tooltip]);

    let l1 = ui.create_layer();
    ui.add_layer(f, l1);
    assert_eq!(ui.all_layers(f), vec![component, l1, tooltip]);

    let l2 = ui.create_layer();
    ui.add_layer(f, l2);
    assert_eq!(ui.all_layers(f), vec![component, l1, l2, tooltip]);

    ui.remove_layer(f, l1);
    assert_eq!(ui.all_layers(f), vec![component, l2, tooltip]);
    assert_eq!(ui.layer_frame(l1), None);
    assert_well_formed(&ui, f);
}

#[test]
fn test_fixed_and_stale_layers_are_ignored() {
    let mut ui = UiContext::new();
    let f = ui.create_frame(Vec2::new(100.0, 100.0));
    let stale = ui.create_layer();
    ui.destroy_layer(stale).unwrap();
    let before = ui.all_layers(f);

    ui.add_layer(f, ui.tooltip_layer(f).unwrap());
    ui.add_layer(f, ui.component_layer(f).unwrap());
    ui.add_layer(f, stale);
    ui.remove_layer(f, stale);

    assert_eq!(ui.all_layers(f), before);
    assert_well_formed(&ui, f);
}

#[test]
fn test_fixed_layers_of_other_frames_are_ignored() {
    let mut ui = UiContext::new();
    let a = ui.create_frame(Vec2::new(100.0, 100.0));
    let b = ui.create_frame(Vec2::new(100.0, 100.0));

    ui.add_layer(a, ui.component_layer(b).unwrap());
    ui.add_layer(a, ui.tooltip_layer(b).unwrap());

    assert!(ui.layers(a).is_empty());
    assert_well_formed(&ui, a);
    assert_well_formed(&ui, b);
}

#[test]
fn test_moving_layer_between_frames() {
    let mut ui = UiContext::new();
    let a = ui.create_frame(Vec2::new(100.0, 100.0));
    let b = ui.create_frame(Vec2::new(100.0, 100.0));
    let shared = ui.create_layer();
    let other = ui.create_layer();
    ui.add_layer(a, shared);
    ui.add_layer(a, other);
    let filler = ui.create_layer();
    ui.add_layer(b, filler);

    ui.add_layer(b, shared);

    assert_eq!(ui.layers(a), vec![other]);
    assert_eq!(*ui.layers(b).last().unwrap(), shared);
    assert_eq!(ui.layer_frame(shared), Some(b));
    assert_well_formed(&ui, a);
    assert_well_formed(&ui, b);
}

#[test]
fn test_remove_untracked_layer_clears_owner_only() {
    let mut ui = UiContext::new();
    let f = ui.create_frame(Vec2::new(100.0, 100.0));
    let tracked = ui.create_layer();
    ui.add_layer(f, tracked);
    let detached = ui.create_layer();

    ui.remove_layer(f, detached);

    assert_eq!(ui.layers(f), vec![tracked]);
    assert_eq!(ui.layer_frame(detached), None);
    assert_well_formed(&ui, f);
}

#[test]
fn test_random_sequences_keep_chain_well_formed() {
    let mut ui = UiContext::new();
    let frames: Vec<FrameId> = (0..3).map(|_| ui.create_frame(Vec2::new(50.0, 50.0))).collect();
    let layers: Vec<LayerId> = (0..6).map(|_| ui.create_layer()).collect();

    // Small LCG so the sequence is reproducible.
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = |bound: usize| {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((seed >> 33) as usize) % bound
    };

    let mut expected: Vec<Vec<LayerId>> = vec![Vec::new(); frames.len()];
    for _ in 0..500 {
        let fi = next(frames.len());
        let layer = layers[next(layers.len())];
        if next(2) == 0 {
            ui.add_layer(frames[fi], layer);
            if !expected[fi].contains(&layer) {
                for list in expected.iter_mut() {
                    list.retain(|&l| l != layer);
                }
                expected[fi].push(layer);
            }
        } else {
            ui.remove_layer(frames[fi], layer);
            for list in expected.iter_mut() {
                list.retain(|&l| l != layer);
            }
        }

        for (i, &frame) in frames.iter().enumerate() {
            assert_eq!(ui.layers(frame), expected[i]);
            assert_well_formed(&ui, frame);
        }
    }
}

#[test]
fn test_destroy_frame_releases_fixed_layers() {
    let mut ui = UiContext::new();
    let f = ui.create_frame(Vec2::new(100.0, 100.0));
    let dialog = ui.create_layer();
    ui.add_layer(f, dialog);
    let component = ui.component_layer(f).unwrap();
    let root = ui.container(f).unwrap();
    let child = ui.panel(strata_ui::Rect::new(0.0, 0.0, 10.0, 10.0));
    ui.add_child(root, child).unwrap();

    ui.destroy_frame(f).unwrap();

    assert!(!ui.frames().contains_layer(component));
    assert!(ui.component(root).is_none());
    assert!(ui.component(child).is_none());
    assert_eq!(ui.layer_frame(dialog), None);
    assert!(ui.all_layers(f).is_empty());

    let g = ui.create_frame(Vec2::new(100.0, 100.0));
    ui.add_layer(g, dialog);
    assert_eq!(ui.layers(g), vec![dialog]);
    assert_well_formed(&ui, g);
}
