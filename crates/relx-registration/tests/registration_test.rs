use relx_core::{ScalarKind, TypeDescriptor};
use relx_io::{import_as_u8, ImportFilter};
use relx_registration::{ParameterMap, ParameterObject, Registration};

fn gaussian_pixels(size: [usize; 2], center: [f64; 2]) -> Vec<f32> {
    let mut data = Vec::with_capacity(size[0] * size[1]);
    for y in 0..size[1] {
        for x in 0..size[0] {
            let dx = x as f64 - center[0];
            let dy = y as f64 - center[1];
            data.push((-(dx * dx + dy * dy) / 18.0).exp() as f32);
        }
    }
    data
}

fn import_gaussian(size: [usize; 2], center: [f64; 2]) -> relx_core::RuntimeImage {
    let pixels = gaussian_pixels(size, center);
    ImportFilter::new()
        .with_size(&size)
        .buffer_f32(&pixels)
        .execute()
        .unwrap()
}

#[test]
fn test_end_to_end_degenerate_run() {
    // Import a 4x4 uint8 buffer with default geometry, then register it
    // against itself with an empty parameter list.
    let pixels: Vec<u8> = (0..16).collect();
    let image = import_as_u8(&pixels, &[4, 4]).unwrap();
    assert_eq!(image.descriptor(), TypeDescriptor::scalar(ScalarKind::UInt8, 2));
    {
        let typed = image.typed::<u8, 2>().unwrap();
        assert_eq!(typed.spacing().to_vec(), vec![1.0, 1.0]);
        assert_eq!(typed.origin().to_vec(), vec![0.0, 0.0]);
    }

    let mut registration = Registration::new();
    registration
        .set_fixed_image(image.clone())
        .set_moving_image(image.clone());
    let result = registration.execute().unwrap();

    assert_eq!(result.descriptor(), image.descriptor());
    assert!(registration.transform_parameter_maps().is_empty());
    assert_eq!(result.typed::<u8, 2>().unwrap().data(), pixels.as_slice());
}

#[test]
fn test_result_outlives_the_run_that_produced_it() {
    let first_moving: Vec<u8> = vec![9; 16];
    let second_moving: Vec<u8> = vec![3; 16];
    let fixed = import_as_u8(&vec![0; 16], &[4, 4]).unwrap();

    let mut registration = Registration::new();
    registration
        .set_fixed_image(fixed.clone())
        .set_moving_image(import_as_u8(&first_moving, &[4, 4]).unwrap());
    let first_result = registration.execute().unwrap();
    let snapshot = first_result.typed::<u8, 2>().unwrap().data().to_vec();

    // Reuse and then drop the driver; the first result must be
    // unaffected.
    registration.set_moving_image(import_as_u8(&second_moving, &[4, 4]).unwrap());
    let second_result = registration.execute().unwrap();
    drop(registration);

    assert_eq!(first_result.typed::<u8, 2>().unwrap().data(), snapshot.as_slice());
    assert_eq!(
        second_result.typed::<u8, 2>().unwrap().data(),
        second_moving.as_slice()
    );
    assert!(!first_result.is_shared());
}

#[test]
fn test_translation_stage_recovers_known_offset() {
    let fixed = import_gaussian([24, 24], [12.0, 12.0]);
    let moving = import_gaussian([24, 24], [14.0, 13.0]);

    let mut map = ParameterObject::default_parameter_map("translation").unwrap();
    map.set("MaximumNumberOfIterations", ["300"]);

    let mut registration = Registration::new();
    registration
        .set_fixed_image(fixed)
        .set_moving_image(moving)
        .set_parameter_map(map);
    let result = registration.execute().unwrap();

    assert_eq!(result.descriptor(), TypeDescriptor::scalar(ScalarKind::Float32, 2));

    let maps = registration.transform_parameter_maps();
    assert_eq!(maps.len(), 1);
    let parameters: Vec<f64> = maps[0]
        .get("TransformParameters")
        .unwrap()
        .iter()
        .map(|value| value.parse().unwrap())
        .collect();
    assert!(
        (parameters[0] - 2.0).abs() < 0.25 && (parameters[1] - 1.0).abs() < 0.25,
        "recovered parameters {parameters:?}"
    );

    // Resampling undid most of the shift: the result peak sits near the
    // fixed peak.
    let typed = result.typed::<f32, 2>().unwrap();
    let mut best = (0usize, 0usize, f32::MIN);
    for y in 0..24 {
        for x in 0..24 {
            let value = typed.pixel([x, y]);
            if value > best.2 {
                best = (x, y, value);
            }
        }
    }
    assert_eq!((best.0, best.1), (12, 12));
}

#[test]
fn test_transform_parameter_map_contents() {
    let fixed = import_gaussian([16, 16], [8.0, 8.0]);
    let moving = import_gaussian([16, 16], [9.0, 8.0]);

    let mut registration = Registration::new();
    registration
        .set_fixed_image(fixed)
        .set_moving_image(moving)
        .set_parameter_map(ParameterObject::default_parameter_map("translation").unwrap());
    registration.execute().unwrap();

    let map = &registration.transform_parameter_maps()[0];
    assert_eq!(map.first("Transform"), Some("TranslationTransform"));
    assert_eq!(map.first("NumberOfParameters"), Some("2"));
    assert_eq!(map.first("FixedImageDimension"), Some("2"));
    assert_eq!(map.first("ResultImagePixelType"), Some("float32"));
    assert_eq!(map.first("HowToCombineTransforms"), Some("Compose"));
    assert_eq!(map.get("Size").unwrap(), &["16".to_string(), "16".to_string()]);
    assert_eq!(map.get("TransformParameters").unwrap().len(), 2);
}

#[test]
fn test_multi_stage_runs_emit_one_map_per_stage() {
    let fixed = import_gaussian([16, 16], [8.0, 8.0]);
    let moving = import_gaussian([16, 16], [9.0, 9.0]);

    let stage = ParameterObject::default_parameter_map("translation")
        .unwrap()
        .with("MaximumNumberOfIterations", ["50"]);
    let mut registration = Registration::new();
    registration
        .set_fixed_image(fixed)
        .set_moving_image(moving)
        .add_parameter_map(stage.clone())
        .add_parameter_map(stage);
    registration.execute().unwrap();

    assert_eq!(registration.transform_parameter_maps().len(), 2);
}

#[test]
fn test_masks_restrict_the_sampled_domain() {
    let fixed = import_gaussian([16, 16], [8.0, 8.0]);
    let moving = import_gaussian([16, 16], [9.0, 8.0]);
    let mask_pixels = vec![1.0f32; 256];
    let fixed_mask = ImportFilter::new()
        .with_size(&[16, 16])
        .buffer_f32(&mask_pixels)
        .execute()
        .unwrap();

    let mut registration = Registration::new();
    registration
        .set_fixed_image(fixed)
        .set_moving_image(moving)
        .set_fixed_mask(fixed_mask)
        .set_parameter_map(ParameterObject::default_parameter_map("translation").unwrap());
    let result = registration.execute().unwrap();
    assert_eq!(result.dimension(), 2);
}

#[test]
fn test_unknown_transform_in_stage_is_rejected() {
    let image = import_as_u8(&[0; 16], &[4, 4]).unwrap();
    let map = ParameterMap::new().with("Transform", ["BSplineTransform"]);

    let mut registration = Registration::new();
    registration
        .set_fixed_image(image.clone())
        .set_moving_image(image)
        .set_parameter_map(map);
    let err = registration.execute().unwrap_err();
    assert!(matches!(
        err,
        relx_registration::RegistrationError::InvalidConfiguration(_)
    ));
}
