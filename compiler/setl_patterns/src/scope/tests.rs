use super::*;

fn child(parent: &LocalScope<Scope>, kind: FrameKind) -> LocalScope<Scope> {
    LocalScope::new(Scope::with_parent(parent.clone(), kind))
}

#[test]
fn lookup_walks_outward() {
    let global = LocalScope::new(Scope::global());
    global.borrow_mut().define(Name::from("x"), Value::int(1));
    let inner = child(&global, FrameKind::Block);
    assert_eq!(inner.borrow().lookup("x"), Some(Value::int(1)));
    assert_eq!(inner.borrow().lookup("y"), None);
}

#[test]
fn define_shadows_without_touching_parent() {
    let global = LocalScope::new(Scope::global());
    global.borrow_mut().define(Name::from("x"), Value::int(1));
    let inner = child(&global, FrameKind::Block);
    inner.borrow_mut().define(Name::from("x"), Value::int(2));
    assert_eq!(inner.borrow().lookup("x"), Some(Value::int(2)));
    assert_eq!(global.borrow().lookup("x"), Some(Value::int(1)));
}

#[test]
fn assignment_in_block_updates_enclosing_binding() {
    let global = LocalScope::new(Scope::global());
    global.borrow_mut().define(Name::from("total"), Value::int(0));
    let body = child(&global, FrameKind::Block);
    body.assign(Name::from("total"), Value::int(5));
    assert_eq!(global.borrow().get_local("total"), Some(&Value::int(5)));
    assert!(body.borrow().is_empty());
}

#[test]
fn new_names_in_blocks_land_in_owning_frame() {
    let global = LocalScope::new(Scope::global());
    let call = child(&global, FrameKind::Procedure);
    let loop_body = child(&call, FrameKind::Block);
    let nested = child(&loop_body, FrameKind::Block);
    nested.assign(Name::from("found"), Value::Bool(true));
    assert_eq!(call.borrow().get_local("found"), Some(&Value::Bool(true)));
    assert!(loop_body.borrow().is_empty());
    assert!(global.borrow().is_empty());
}

#[test]
fn procedure_frames_are_a_write_barrier() {
    let global = LocalScope::new(Scope::global());
    global.borrow_mut().define(Name::from("x"), Value::int(1));
    let call = child(&global, FrameKind::Procedure);
    call.assign(Name::from("x"), Value::int(2));
    assert_eq!(call.borrow().get_local("x"), Some(&Value::int(2)));
    assert_eq!(global.borrow().get_local("x"), Some(&Value::int(1)));
}

#[test]
fn closure_frames_write_through_to_captured_frame() {
    let global = LocalScope::new(Scope::global());
    let defining = child(&global, FrameKind::Procedure);
    defining.borrow_mut().define(Name::from("count"), Value::int(0));
    let call = child(&defining, FrameKind::Closure);
    call.assign(Name::from("count"), Value::int(1));
    assert_eq!(defining.borrow().get_local("count"), Some(&Value::int(1)));

    call.assign(Name::from("fresh"), Value::int(7));
    assert_eq!(call.borrow().get_local("fresh"), Some(&Value::int(7)));
    assert_eq!(defining.borrow().get_local("fresh"), None);
}

#[test]
fn owner_of_global_is_global() {
    let global = LocalScope::new(Scope::global());
    let block = child(&global, FrameKind::Block);
    assert!(block.owner().ptr_eq(&global));
    assert!(global.owner().ptr_eq(&global));
}

#[test]
fn removing_a_local_binding() {
    let mut scope = Scope::global();
    scope.define(Name::from("e"), Value::string("boom"));
    assert_eq!(scope.remove_local("e"), Some(Value::string("boom")));
    assert_eq!(scope.len(), 0);
}
