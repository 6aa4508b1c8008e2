//! Seeded in-memory store shared by query tests.

use uuid::Uuid;

use crate::entry::{JobEntry, JobStatus, LegacySubIdEntry, ProductEntry, ScanFolderEntry, SourceEntry};
use crate::storage::AssetDatabase;

pub struct Fixture {
    pub db: AssetDatabase,
    pub builder: Uuid,
    pub assets: ScanFolderEntry,
    pub gems: ScanFolderEntry,
    pub rock: SourceEntry,
    pub tree: SourceEntry,
    pub done: SourceEntry,
    pub rock_pc: JobEntry,
    pub rock_android: JobEntry,
    pub tree_compile: JobEntry,
    pub tree_copy: JobEntry,
    pub done_pc: JobEntry,
    pub rock_dds: ProductEntry,
    pub rock_astc: ProductEntry,
    pub tree_mesh: ProductEntry,
    pub tree_mat: ProductEntry,
    pub tree_fbx: ProductEntry,
    pub done_txt: ProductEntry,
}

fn folder(db: &AssetDatabase, path: &str, name: &str, key: &str) -> ScanFolderEntry {
    let mut entry = ScanFolderEntry::new(path, name, key, "", true);
    db.set_entry(&mut entry).unwrap();
    entry
}

fn source(db: &AssetDatabase, folder: &ScanFolderEntry, name: &str) -> SourceEntry {
    let mut entry = SourceEntry::new(folder.scan_folder_id, name, Uuid::new_v4(), "fp");
    db.set_entry(&mut entry).unwrap();
    entry
}

fn job(db: &AssetDatabase, source: &SourceEntry, key: &str, platform: &str, builder: Uuid, status: JobStatus, run_key: u64) -> JobEntry {
    let mut entry = JobEntry::new(source.source_id, key, 7, platform, builder, status, run_key);
    db.set_entry(&mut entry).unwrap();
    entry
}

fn product(db: &AssetDatabase, job: &JobEntry, sub_id: u32, name: &str) -> ProductEntry {
    let mut entry = ProductEntry::new(job.job_id, sub_id, name, Uuid::new_v4(), Uuid::new_v4());
    db.set_entry(&mut entry).unwrap();
    entry
}

impl Fixture {
    pub fn new() -> Self {
        let db = AssetDatabase::open_in_memory().unwrap();
        let builder = Uuid::new_v4();
        let other_builder = Uuid::new_v4();

        let assets = folder(&db, "/game/assets", "Assets", "assets");
        let gems = folder(&db, "/game/gems", "Gems", "gems");

        let rock = source(&db, &assets, "textures/rock.png");
        let tree = source(&db, &assets, "meshes/tree.fbx");
        let done = source(&db, &gems, "docs/100%_done.txt");

        let rock_pc = job(&db, &rock, "Compile", "pc", builder, JobStatus::Completed, 1);
        let rock_android = job(&db, &rock, "Compile", "android", builder, JobStatus::Failed, 2);
        let tree_compile = job(&db, &tree, "Compile", "pc", builder, JobStatus::Completed, 3);
        let tree_copy = job(&db, &tree, "Copy", "pc", other_builder, JobStatus::Queued, 4);
        let done_pc = job(&db, &done, "Compile", "pc", builder, JobStatus::Completed, 5);

        let rock_dds = product(&db, &rock_pc, 0, "pc/textures/rock.dds");
        let rock_astc = product(&db, &rock_android, 0, "android/textures/rock.astc");
        let tree_mesh = product(&db, &tree_compile, 0, "pc/meshes/tree.mesh");
        let tree_mat = product(&db, &tree_compile, 1, "pc/meshes/tree.mat");
        let tree_fbx = product(&db, &tree_copy, 0, "pc/meshes/tree.fbx");
        let done_txt = product(&db, &done_pc, 0, "pc/docs/100%_done.txt");

        let mut legacy = LegacySubIdEntry::new(tree_mesh.product_id, 1000);
        db.set_entry(&mut legacy).unwrap();

        Self {
            db,
            builder,
            assets,
            gems,
            rock,
            tree,
            done,
            rock_pc,
            rock_android,
            tree_compile,
            tree_copy,
            done_pc,
            rock_dds,
            rock_astc,
            tree_mesh,
            tree_mat,
            tree_fbx,
            done_txt,
        }
    }
}
