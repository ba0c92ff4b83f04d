use super::*;

#[test]
fn equivalent_paths_share_a_gate() {
    let reg = GateRegistry::new();
    let a = reg.gate(Path::new("scene.tsx"));
    let b = reg.gate(Path::new("./scene.tsx"));
    let c = reg.gate(Path::new("other.tsx"));
    assert!(a.same_as(&b));
    assert!(!a.same_as(&c));
    assert!(a.path().is_absolute());
    assert_eq!(reg.len(), 2);
}

#[test]
fn dropped_gates_are_pruned() {
    let reg = GateRegistry::new();
    for i in 0..16 {
        let _gate = reg.gate(Path::new(&format!("scene-{i}.tsx")));
    }
    let kept = reg.gate(Path::new("kept.tsx"));
    assert_eq!(reg.len(), 1);

    let guard = kept.lock(Duration::from_millis(10)).unwrap();
    drop(kept);
    let _other = reg.gate(Path::new("other.tsx"));
    assert_eq!(reg.len(), 2);
    drop(guard);
}

#[test]
fn registries_are_independent() {
    let a = GateRegistry::new().gate(Path::new("scene.tsx"));
    let b = GateRegistry::new().gate(Path::new("scene.tsx"));
    assert!(!a.same_as(&b));

    let _held = a.lock(Duration::from_millis(10)).unwrap();
    assert!(b.lock(Duration::from_millis(10)).is_ok());
}

#[test]
fn busy_gate_times_out() {
    let reg = GateRegistry::new();
    let gate = reg.gate(Path::new("busy.tsx"));
    let held = gate.lock(Duration::from_millis(10)).unwrap();

    let err = match gate.lock(Duration::from_millis(20)) {
        Err(err) => err,
        Ok(_) => panic!("gate should be busy"),
    };
    match err {
        SceneError::Io { op, source, .. } => {
            assert_eq!(op, "lock");
            assert_eq!(source.kind(), io::ErrorKind::TimedOut);
        }
        other => panic!("unexpected error: {other}"),
    }

    drop(held);
    assert!(gate.lock(Duration::from_millis(10)).is_ok());
}

#[test]
fn waiters_proceed_once_released() {
    let reg = Arc::new(GateRegistry::new());
    let gate = reg.gate(Path::new("shared.tsx"));
    let held = gate.lock(Duration::from_millis(10)).unwrap();

    let other = reg.gate(Path::new("shared.tsx"));
    let waiter = std::thread::spawn(move || other.lock(Duration::from_secs(5)).is_ok());
    std::thread::sleep(Duration::from_millis(20));
    drop(held);
    assert!(waiter.join().unwrap());
}

#[test]
fn global_registry_is_shared() {
    let a = GateRegistry::global().gate(Path::new("global-scene.tsx"));
    let b = GateRegistry::global().gate(Path::new("global-scene.tsx"));
    assert!(a.same_as(&b));
}
