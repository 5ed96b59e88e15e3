use rados::SnapId;

mod common;

#[test]
fn integration_managed_snapshot_rollback() {
    let ioctx = common::mem_ioctx("managed-rollback");
    let before = common::random_data(64);
    ioctx.write_full("obj", &before).expect("write full");

    let snap = ioctx.create_managed_snapshot().expect("create snapshot");
    ioctx.write("obj", &common::random_data(100), 10).expect("write");

    ioctx
        .rollback_managed_object("obj", &snap)
        .expect("rollback");

    let mut buf = vec![0u8; 200];
    let n = ioctx.read("obj", &mut buf, 0).expect("read");
    assert_eq!(&buf[..n], &before[..], "pre-write content restored");

    ioctx.remove_managed_snapshot(snap).expect("remove snapshot");
}

#[test]
fn integration_managed_snapshot_removed() {
    let ioctx = common::mem_ioctx("managed-removed");
    ioctx.write_full("obj", b"x").expect("write full");

    let snap = ioctx.create_managed_snapshot().expect("create snapshot");
    let other = ioctx.create_managed_snapshot().expect("create snapshot");
    assert_ne!(snap.id(), other.id(), "identifiers are unique");

    ioctx.remove_managed_snapshot(other).expect("remove snapshot");
    ioctx.remove_managed_snapshot(snap).expect("remove snapshot");
}

#[test]
fn integration_read_snapshot() {
    let mut ioctx = common::mem_ioctx("read-snapshot");
    assert_eq!(ioctx.read_snapshot(), SnapId::HEAD);

    ioctx.write_full("obj", b"v1").expect("write full");
    let snap = ioctx.create_managed_snapshot().expect("create snapshot");
    ioctx.write_full("obj", b"v2").expect("write full");

    ioctx.set_read_snapshot(snap.id());
    assert_eq!(ioctx.read_snapshot(), snap.id());

    let mut buf = [0u8; 2];
    ioctx.read("obj", &mut buf, 0).expect("read from snapshot");
    assert_eq!(&buf, b"v1");

    // Writes aren't affected by the read snapshot.
    ioctx.write_full("obj", b"v3").expect("write full");
    ioctx.read("obj", &mut buf, 0).expect("read from snapshot");
    assert_eq!(&buf, b"v1");

    ioctx.set_read_snapshot(SnapId::HEAD);
    ioctx.read("obj", &mut buf, 0).expect("read head");
    assert_eq!(&buf, b"v3");
}

#[test]
fn integration_pool_snapshot_rollback() {
    let ioctx = common::mem_ioctx("pool-rollback");
    ioctx.write_full("obj", b"original").expect("write full");
    ioctx.create_pool_snapshot("s1").expect("create snapshot");

    ioctx.write_full("obj", b"changed").expect("write full");
    ioctx.write_full("created-later", b"x").expect("write full");

    ioctx.rollback_object("obj", "s1").expect("rollback");
    ioctx
        .rollback_object("created-later", "s1")
        .expect("rollback an object that didn't exist");

    let mut buf = [0u8; 16];
    let n = ioctx.read("obj", &mut buf, 0).expect("read");
    assert_eq!(&buf[..n], b"original");

    let err = ioctx
        .stat("created-later")
        .expect_err("rollback removes it");
    common::assert_rados_code(err, -libc::ENOENT, "stat");
}

#[test]
fn integration_pool_snapshot_lifecycle() {
    let ioctx = common::mem_ioctx("pool-lifecycle");
    ioctx.write_full("obj", b"x").expect("write full");

    ioctx.create_pool_snapshot("s1").expect("create snapshot");
    let err = ioctx
        .create_pool_snapshot("s1")
        .expect_err("duplicated name");
    common::assert_rados_code(err, -libc::EEXIST, "create duplicated");

    let snap = ioctx.lookup_pool_snapshot("s1").expect("lookup");
    assert_eq!(snap.name, "s1");
    assert!(!snap.id.is_head());

    ioctx.remove_pool_snapshot("s1").expect("remove snapshot");
    let err = ioctx
        .rollback_object("obj", "s1")
        .expect_err("rollback to a removed snapshot");
    common::assert_rados_code(err, -libc::ENOENT, "rollback removed");

    let err = ioctx
        .remove_pool_snapshot("s1")
        .expect_err("remove twice");
    common::assert_rados_code(err, -libc::ENOENT, "remove twice");

    let err = ioctx.lookup_pool_snapshot("s1").expect_err("lookup removed");
    common::assert_rados_code(err, -libc::ENOENT, "lookup removed");
}

#[test]
fn integration_read_pool_snapshot() {
    let mut ioctx = common::mem_ioctx("read-pool-snapshot");
    ioctx.write_full("obj", b"before").expect("write full");
    ioctx.create_pool_snapshot("s1").expect("create snapshot");
    ioctx.delete("obj").expect("delete");

    let snap = ioctx.lookup_pool_snapshot("s1").expect("lookup");
    ioctx.set_read_snapshot(snap.id);

    let mut buf = [0u8; 6];
    ioctx.read("obj", &mut buf, 0).expect("read deleted object from snapshot");
    assert_eq!(&buf, b"before");
}

#[test]
fn integration_snapshot_kinds_dont_mix() {
    let ioctx = common::mem_ioctx("snapshot-kinds");
    ioctx.create_pool_snapshot("s1").expect("create pool snapshot");

    let err = ioctx
        .create_managed_snapshot()
        .expect_err("pool already has pool snapshots");
    common::assert_rados_code(err, -libc::EINVAL, "create managed snapshot");
}
