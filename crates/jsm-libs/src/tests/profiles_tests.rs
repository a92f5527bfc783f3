use jsm_surface::{Mode, Requirement};

use crate::profiles::*;

#[test]
fn test_js_profile_requires_the_array_surface() {
    let profile = profile_for(Mode::Js);
    assert_eq!(JS_ARRAY_MEMBERS.len(), 25);
    for member in JS_ARRAY_MEMBERS {
        let requirement = Requirement::Member { interface: "Array".to_string(), member: (*member).to_string() };
        assert!(profile.required.contains(&requirement), "missing {member}");
    }
    assert!(profile.required.contains(&Requirement::Global { name: "console".to_string() }));
    assert!(profile.excluded.is_empty());
}

#[test]
fn test_host_native_profile_excludes_host_apis() {
    let profile = profile_for(Mode::HostNative);
    assert!(profile.required.is_empty());
    for name in ["fetch", "window", "document", "process", "require", "XMLHttpRequest"] {
        assert!(profile.is_excluded(name), "{name} should be excluded");
    }
    assert_eq!(profile.excluded.len(), HOST_NATIVE_EXCLUSIONS.len());
}
